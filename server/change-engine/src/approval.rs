//! Approval progress: approved / total / rounded percentage.

use crate::types::{ApprovalProgress, Approver};

/// `round_half_up(part / total * 100)` in integer arithmetic; 0 when total is 0.
pub fn percent(part: u32, total: u32) -> u8 {
  if total == 0 {
    return 0;
  }
  let part = u64::from(part.min(total));
  let total = u64::from(total);
  ((part * 200 + total) / (total * 2)) as u8
}

impl ApprovalProgress {
  pub fn from_counts(approved: u32, total: u32) -> Self {
    Self {
      approved,
      total,
      percent: percent(approved, total),
    }
  }

  /// Everyone signed off. An empty approver list is not "complete".
  pub fn is_complete(&self) -> bool {
    self.total > 0 && self.approved == self.total
  }
}

/// Summarize sign-off progress. Order of `approvers` does not matter.
pub fn aggregate_approvals(approvers: &[Approver]) -> ApprovalProgress {
  let approved = approvers.iter().filter(|a| a.is_approved()).count() as u32;
  ApprovalProgress::from_counts(approved, approvers.len() as u32)
}

/// Names still waiting to approve, in list order.
pub fn pending_names(approvers: &[Approver]) -> Vec<String> {
  approvers
    .iter()
    .filter(|a| !a.is_approved())
    .map(|a| a.name().to_string())
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::ApprovalStatus;
  use chrono::{TimeZone, Utc};

  fn approvers(statuses: &[ApprovalStatus]) -> Vec<Approver> {
    statuses
      .iter()
      .enumerate()
      .map(|(i, s)| Approver::new(format!("approver-{}", i), *s).unwrap())
      .collect()
  }

  #[test]
  fn two_of_three_is_67_percent() {
    use ApprovalStatus::*;
    let progress = aggregate_approvals(&approvers(&[Approved, Approved, Pending]));
    assert_eq!(
      progress,
      ApprovalProgress {
        approved: 2,
        total: 3,
        percent: 67
      }
    );
  }

  #[test]
  fn empty_list_is_zero() {
    let progress = aggregate_approvals(&[]);
    assert_eq!(progress, ApprovalProgress::default());
    assert!(!progress.is_complete());
  }

  #[test]
  fn rounds_half_up() {
    assert_eq!(percent(1, 8), 13); // 12.5
    assert_eq!(percent(1, 3), 33);
    assert_eq!(percent(1, 2), 50);
    assert_eq!(percent(5, 5), 100);
    assert_eq!(percent(0, 7), 0);
  }

  #[test]
  fn percent_is_monotonic_in_approvals() {
    for total in 1..=12u32 {
      for approved in 0..total {
        assert!(
          percent(approved + 1, total) >= percent(approved, total),
          "{}/{} decreased",
          approved,
          total
        );
      }
    }
  }

  #[test]
  fn approving_one_never_lowers_progress() {
    use ApprovalStatus::*;
    let mut list = approvers(&[Pending, Approved, Pending, Pending]);
    let before = aggregate_approvals(&list);
    let at = Utc.with_ymd_and_hms(2024, 9, 1, 9, 0, 0).unwrap();
    list[2].approve(at).unwrap();
    let after = aggregate_approvals(&list);
    assert!(after.percent >= before.percent);
    assert_eq!(after.approved, before.approved + 1);
    assert_eq!(after.total, before.total);
  }

  #[test]
  fn order_does_not_matter() {
    use ApprovalStatus::*;
    let mut list = approvers(&[Approved, Pending, Pending, Approved, Approved]);
    let forward = aggregate_approvals(&list);
    list.reverse();
    assert_eq!(forward, aggregate_approvals(&list));
    assert_eq!(forward.percent, 60);
  }

  #[test]
  fn complete_and_pending_names() {
    use ApprovalStatus::*;
    let list = approvers(&[Approved, Pending]);
    assert_eq!(pending_names(&list), vec!["approver-1".to_string()]);
    assert!(!aggregate_approvals(&list).is_complete());
    assert!(aggregate_approvals(&approvers(&[Approved, Approved])).is_complete());
  }
}
