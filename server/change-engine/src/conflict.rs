//! Scheduling conflicts: two changes collide when their windows overlap and
//! they touch at least one common system.
//!
//! Windows are half-open, so a change ending at T never collides with one
//! starting at T. Records are matched to themselves by `id` only.

use std::collections::BTreeSet;

use crate::types::ChangeRecord;

/// Half-open interval overlap.
pub fn windows_overlap(a: &ChangeRecord, b: &ChangeRecord) -> bool {
  a.start_time() < b.end_time() && a.end_time() > b.start_time()
}

/// System names both changes affect (exact, case-sensitive).
pub fn shared_systems<'a>(a: &'a ChangeRecord, b: &'a ChangeRecord) -> Vec<&'a str> {
  a.affected_systems()
    .intersection(b.affected_systems())
    .map(String::as_str)
    .collect()
}

fn collides(target: &ChangeRecord, other: &ChangeRecord) -> bool {
  other.id() != target.id()
    && windows_overlap(target, other)
    && target
      .affected_systems()
      .iter()
      .any(|s| other.affected_systems().contains(s))
}

/// True if any candidate other than `target` itself collides with it.
pub fn has_conflict(target: &ChangeRecord, candidates: &[ChangeRecord]) -> bool {
  candidates.iter().any(|other| collides(target, other))
}

/// Every candidate that collides with `target`, in candidate order.
pub fn conflicts_for<'a>(
  target: &ChangeRecord,
  candidates: &'a [ChangeRecord],
) -> Vec<&'a ChangeRecord> {
  candidates
    .iter()
    .filter(|other| collides(target, other))
    .collect()
}

/// Ids of all records in the set that collide with at least one other.
pub fn conflicting_ids(records: &[ChangeRecord]) -> BTreeSet<String> {
  records
    .iter()
    .filter(|r| has_conflict(r, records))
    .map(|r| r.id().to_string())
    .collect()
}
