//! Core engine: validates a snapshot and evaluates every change in it.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::approval;
use crate::config::Config;
use crate::conflict;
use crate::error::EngineError;
use crate::normalize;
use crate::types::*;

/// Stateless evaluator; every call takes a full snapshot.
#[derive(Debug, Clone)]
pub struct Engine {
  config: Config,
}

/// Validated view of one snapshot, keyed by change id.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
  pub changes: Vec<ChangeRecord>,
  pub approvals: BTreeMap<String, Vec<Approver>>,
  pub assessments: BTreeMap<String, RiskAssessment>,
}

impl Engine {
  pub fn new(config: Config) -> Self {
    Self { config }
  }

  pub fn with_defaults() -> Self {
    Self::new(Config::default())
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Normalize and cross-check an inbound snapshot.
  ///
  /// Rejects duplicate change ids, approvals or assessments for unknown
  /// changes, and more than one assessment per change. Approval entries for
  /// the same change are merged.
  pub fn load(&self, raw: &InboundSnapshot) -> Result<Snapshot, EngineError> {
    let changes = raw
      .changes
      .iter()
      .map(|c| normalize::normalize_change(c, &self.config))
      .collect::<Result<Vec<_>, EngineError>>()?;

    let mut ids = BTreeSet::new();
    for change in &changes {
      if !ids.insert(change.id()) {
        return Err(EngineError::invalid(
          "changes[].id",
          &format!("duplicate change id {}", change.id()),
        ));
      }
    }

    let mut approvals: BTreeMap<String, Vec<Approver>> = BTreeMap::new();
    for entry in &raw.approvals {
      let change_id = entry.change_id.trim();
      if !ids.contains(change_id) {
        return Err(EngineError::invalid(
          "approvals[].change_id",
          &format!("unknown change id {}", change_id),
        ));
      }
      let approvers = normalize::normalize_approvers(entry)?;
      approvals
        .entry(change_id.to_string())
        .or_default()
        .extend(approvers);
    }

    let mut assessments = BTreeMap::new();
    for entry in &raw.assessments {
      let assessment = normalize::normalize_assessment(entry)?;
      let change_id = assessment.change_id().to_string();
      if !ids.contains(change_id.as_str()) {
        return Err(EngineError::invalid(
          "assessments[].change_id",
          &format!("unknown change id {}", change_id),
        ));
      }
      if assessments.insert(change_id.clone(), assessment).is_some() {
        return Err(EngineError::invalid(
          "assessments[].change_id",
          &format!("more than one assessment for {}", change_id),
        ));
      }
    }

    Ok(Snapshot {
      changes,
      approvals,
      assessments,
    })
  }

  /// Validate and evaluate an inbound snapshot.
  pub fn process(&self, raw: &InboundSnapshot) -> Result<EvaluationReport, EngineError> {
    let snapshot = self.load(raw)?;
    Ok(self.evaluate(&snapshot))
  }

  /// Parse one JSON line and evaluate it. Malformed JSON surfaces as
  /// `EngineError::Json`.
  pub fn process_line(&self, line: &str) -> Result<EvaluationReport, EngineError> {
    let raw: InboundSnapshot = serde_json::from_str(line)?;
    self.process(&raw)
  }

  /// Evaluate an already-validated snapshot. Reports are ordered by change id.
  pub fn evaluate(&self, snapshot: &Snapshot) -> EvaluationReport {
    let mut ordered: Vec<&ChangeRecord> = snapshot.changes.iter().collect();
    ordered.sort_by(|a, b| a.id().cmp(b.id()).then(a.version().cmp(&b.version())));

    let changes: Vec<ChangeReport> = ordered
      .iter()
      .map(|record| self.evaluate_change(record, snapshot))
      .collect();

    let summary = ReportSummary {
      total_changes: changes.len() as u32,
      conflicting: changes.iter().filter(|c| c.has_conflict).count() as u32,
      fully_approved: changes.iter().filter(|c| c.approvals.is_complete()).count() as u32,
      cab_review: changes.iter().filter(|c| c.requires_cab_review).count() as u32,
    };

    let snapshot_id = snapshot_id(&ordered);
    info!(
      snapshot_id = %snapshot_id,
      changes = summary.total_changes,
      conflicting = summary.conflicting,
      cab_review = summary.cab_review,
      "evaluated snapshot"
    );

    EvaluationReport {
      snapshot_id,
      changes,
      summary,
    }
  }

  fn evaluate_change(&self, record: &ChangeRecord, snapshot: &Snapshot) -> ChangeReport {
    let conflicts_with: Vec<String> = conflict::conflicts_for(record, &snapshot.changes)
      .into_iter()
      .map(|other| other.id().to_string())
      .collect::<BTreeSet<_>>()
      .into_iter()
      .collect();

    let approvers = snapshot
      .approvals
      .get(record.id())
      .map(Vec::as_slice)
      .unwrap_or(&[]);
    let approvals = approval::aggregate_approvals(approvers);

    let assessment = snapshot.assessments.get(record.id());
    let overall_risk = assessment.map(RiskAssessment::overall_risk);
    let requires_cab_review = assessment
      .map(|a| a.requires_cab_review(self.config.cab_review_threshold))
      .unwrap_or(false);

    debug!(
      change = record.id(),
      version = record.version(),
      conflicts = conflicts_with.len(),
      approved = approvals.approved,
      total = approvals.total,
      overall_risk = overall_risk.map(RiskLevel::as_str).unwrap_or("-"),
      "evaluated change"
    );

    ChangeReport {
      id: record.id().to_string(),
      version: record.version(),
      title: record.title().map(str::to_string),
      start_time: record.start_time().to_rfc3339(),
      end_time: record.end_time().to_rfc3339(),
      has_conflict: !conflicts_with.is_empty(),
      conflicts_with,
      approvals,
      pending_approvers: approval::pending_names(approvers),
      overall_risk,
      requires_cab_review,
      mitigation: assessment
        .filter(|a| !a.mitigations.is_empty())
        .map(RiskAssessment::mitigation_progress),
      top_factor_score: assessment
        .and_then(RiskAssessment::highest_factor)
        .map(RiskFactor::score),
      approval_required: assessment
        .map(|a| a.approval_required.clone())
        .unwrap_or_default(),
      testing_required: assessment.map(|a| a.testing_required).unwrap_or(false),
      recommendation: assessment.and_then(|a| a.recommendation),
    }
  }
}

/// Stable id over the ordered change windows: "snap-" + 16 hex chars.
fn snapshot_id(ordered: &[&ChangeRecord]) -> String {
  let mut hasher = blake3::Hasher::new();
  for record in ordered {
    hasher.update(record.id().as_bytes());
    hasher.update(b"|");
    hasher.update(record.version().to_string().as_bytes());
    hasher.update(b"|");
    hasher.update(record.start_time().to_rfc3339().as_bytes());
    hasher.update(b"|");
    hasher.update(record.end_time().to_rfc3339().as_bytes());
    for system in record.affected_systems() {
      hasher.update(b"|");
      hasher.update(system.as_bytes());
    }
    hasher.update(b"\n");
  }
  let hex = hasher.finalize().to_hex();
  format!("snap-{}", &hex[..16])
}
