//! Risk roll-up: a change is only as safe as its riskiest dimension.

use crate::types::{
  ApprovalProgress, MitigationStatus, RiskAssessment, RiskDimension, RiskFactor, RiskLevel,
};

/// Highest level among the dimensions; `None` only for an empty slice.
pub fn roll_up_risk(dimensions: &[RiskDimension]) -> Option<RiskLevel> {
  dimensions.iter().map(|d| d.level).max()
}

impl RiskFactor {
  /// The assessor's score when given, otherwise impact × probability (1..=9).
  pub fn score(&self) -> u8 {
    self
      .risk_score
      .unwrap_or_else(|| self.derived_score())
  }

  pub fn derived_score(&self) -> u8 {
    self.impact.weight() * self.probability.weight()
  }
}

impl RiskAssessment {
  pub fn overall_risk(&self) -> RiskLevel {
    // Construction guarantees at least one dimension.
    roll_up_risk(self.dimensions()).unwrap_or(RiskLevel::VeryLow)
  }

  /// Overall risk at or above `threshold` routes the change to the CAB.
  pub fn requires_cab_review(&self, threshold: RiskLevel) -> bool {
    self.overall_risk() >= threshold
  }

  /// Top-scoring factor; ties keep the first listed.
  pub fn highest_factor(&self) -> Option<&RiskFactor> {
    // max_by_key keeps the last maximum, so scan in reverse.
    self.factors.iter().rev().max_by_key(|f| f.score())
  }

  pub fn mitigation_progress(&self) -> ApprovalProgress {
    let done = self
      .mitigations
      .iter()
      .filter(|m| m.status == MitigationStatus::Completed)
      .count() as u32;
    ApprovalProgress::from_counts(done, self.mitigations.len() as u32)
  }
}
