//! Core types for the change engine (JSON contracts + validated entities).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Inbound types (JSON contract — what the caller sends)
// ---------------------------------------------------------------------------

/// One snapshot line from stdin. Unknown fields are silently ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundSnapshot {
  #[serde(default)]
  pub changes: Vec<InboundChange>,
  #[serde(default)]
  pub approvals: Vec<InboundApproval>,
  #[serde(default)]
  pub assessments: Vec<InboundAssessment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundChange {
  pub id: String,
  #[serde(alias = "startTime", alias = "start")]
  pub start_time: String,
  #[serde(alias = "endTime", alias = "end")]
  pub end_time: String,
  #[serde(alias = "affectedSystems", alias = "systems")]
  pub affected_systems: Vec<String>,
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default, alias = "type")]
  pub change_type: Option<String>,
  #[serde(default)]
  pub version: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundApproval {
  #[serde(alias = "changeId")]
  pub change_id: String,
  #[serde(default)]
  pub approvers: Vec<InboundApprover>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundApprover {
  pub name: String,
  pub status: String,
  #[serde(default)]
  pub role: Option<String>,
  #[serde(default, alias = "date")]
  pub approved_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundAssessment {
  #[serde(alias = "changeId", alias = "rfcId")]
  pub change_id: String,
  #[serde(default, alias = "businessImpact")]
  pub business_impact: Option<String>,
  #[serde(default, alias = "technicalRisk")]
  pub technical_risk: Option<String>,
  #[serde(default, alias = "securityRisk")]
  pub security_risk: Option<String>,
  #[serde(default, alias = "riskFactors")]
  pub factors: Vec<InboundFactor>,
  #[serde(default, alias = "mitigationStrategies")]
  pub mitigations: Vec<InboundMitigation>,
  #[serde(default, alias = "approvalRequired")]
  pub approval_required: Vec<String>,
  #[serde(default, alias = "testingRequired")]
  pub testing_required: bool,
  #[serde(default)]
  pub recommendation: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundFactor {
  pub category: String,
  #[serde(default)]
  pub description: String,
  pub impact: String,
  pub probability: String,
  #[serde(default, alias = "riskScore")]
  pub risk_score: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundMitigation {
  #[serde(default)]
  pub risk: String,
  #[serde(default)]
  pub strategy: String,
  #[serde(default)]
  pub responsible: String,
  pub status: String,
}

// ---------------------------------------------------------------------------
// Enums (normalized)
// ---------------------------------------------------------------------------

/// Ordinal risk lattice. Variant order is the ordinal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskLevel {
  #[serde(rename = "Very Low")]
  VeryLow,
  Low,
  Medium,
  High,
  #[serde(rename = "Very High")]
  VeryHigh,
}

impl RiskLevel {
  pub const ALL: [RiskLevel; 5] = [
    Self::VeryLow,
    Self::Low,
    Self::Medium,
    Self::High,
    Self::VeryHigh,
  ];

  /// Accepts "Very High", "very_high", "VeryHigh", "very-high" and friends.
  pub fn from_str_loose(s: &str) -> Option<Self> {
    let key: String = s
      .chars()
      .filter(|c| !matches!(c, ' ' | '_' | '-'))
      .collect::<String>()
      .to_ascii_lowercase();
    match key.as_str() {
      "verylow" => Some(Self::VeryLow),
      "low" => Some(Self::Low),
      "medium" | "med" => Some(Self::Medium),
      "high" => Some(Self::High),
      "veryhigh" => Some(Self::VeryHigh),
      _ => None,
    }
  }

  pub fn ordinal(self) -> u8 {
    self as u8
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::VeryLow => "Very Low",
      Self::Low => "Low",
      Self::Medium => "Medium",
      Self::High => "High",
      Self::VeryHigh => "Very High",
    }
  }
}

impl fmt::Display for RiskLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Deserializes through [`RiskLevel::from_str_loose`] so TOML config and
/// JSON snapshots accept the same spellings.
impl<'de> Deserialize<'de> for RiskLevel {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    let raw = String::deserialize(deserializer)?;
    Self::from_str_loose(&raw).ok_or_else(|| {
      serde::de::Error::custom(format!(
        "unknown risk level {:?}, expected very low|low|medium|high|very high",
        raw
      ))
    })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
  Approved,
  Pending,
}

impl ApprovalStatus {
  pub fn from_str_loose(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "approved" | "approve" | "done" | "承認済" => Some(Self::Approved),
      "pending" | "waiting" | "requested" | "未承認" => Some(Self::Pending),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
  Standard,
  Normal,
  Emergency,
}

impl ChangeType {
  pub fn from_str_loose(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "standard" => Some(Self::Standard),
      "normal" => Some(Self::Normal),
      "emergency" => Some(Self::Emergency),
      _ => None,
    }
  }
}

/// Which axis of an assessment a dimension measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionKind {
  BusinessImpact,
  TechnicalRisk,
  SecurityRisk,
}

/// Three-step rating used for risk factor impact and probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorRating {
  Low,
  Medium,
  High,
}

impl FactorRating {
  pub fn from_str_loose(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "low" => Some(Self::Low),
      "medium" | "med" => Some(Self::Medium),
      "high" => Some(Self::High),
      _ => None,
    }
  }

  pub fn weight(self) -> u8 {
    match self {
      Self::Low => 1,
      Self::Medium => 2,
      Self::High => 3,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorCategory {
  Technical,
  Business,
  Security,
  Operational,
}

impl FactorCategory {
  pub fn from_str_loose(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "technical" => Some(Self::Technical),
      "business" => Some(Self::Business),
      "security" => Some(Self::Security),
      "operational" => Some(Self::Operational),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MitigationStatus {
  Planned,
  InProgress,
  Completed,
}

impl MitigationStatus {
  pub fn from_str_loose(s: &str) -> Option<Self> {
    let key: String = s
      .chars()
      .filter(|c| !matches!(c, ' ' | '_' | '-'))
      .collect::<String>()
      .to_ascii_lowercase();
    match key.as_str() {
      "planned" => Some(Self::Planned),
      "inprogress" => Some(Self::InProgress),
      "completed" | "done" => Some(Self::Completed),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
  Approve,
  ConditionalApproval,
  Reject,
  MoreInformationNeeded,
}

impl Recommendation {
  pub fn from_str_loose(s: &str) -> Option<Self> {
    let key: String = s
      .chars()
      .filter(|c| !matches!(c, ' ' | '_' | '-'))
      .collect::<String>()
      .to_ascii_lowercase();
    match key.as_str() {
      "approve" => Some(Self::Approve),
      "conditionalapproval" => Some(Self::ConditionalApproval),
      "reject" => Some(Self::Reject),
      "moreinformationneeded" | "moreinfo" => Some(Self::MoreInformationNeeded),
      _ => None,
    }
  }
}

// ---------------------------------------------------------------------------
// Change record
// ---------------------------------------------------------------------------

/// One scheduled change. Fields are read-only after construction; a
/// reschedule yields a new version via [`ChangeRecord::rescheduled`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
  id: String,
  version: u32,
  start_time: DateTime<Utc>,
  end_time: DateTime<Utc>,
  affected_systems: BTreeSet<String>,
  title: Option<String>,
  change_type: Option<ChangeType>,
}

impl ChangeRecord {
  /// Validates `start < end`, a non-empty id and at least one named system.
  pub fn new<I, S>(
    id: impl Into<String>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    affected_systems: I,
  ) -> Result<Self, EngineError>
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let id = id.into();
    if id.trim().is_empty() {
      return Err(EngineError::invalid("id", "must not be empty"));
    }
    check_window(start_time, end_time)?;

    let mut systems = BTreeSet::new();
    for system in affected_systems {
      let system = system.into();
      if system.is_empty() {
        return Err(EngineError::invalid(
          "affected_systems",
          "system names must not be empty",
        ));
      }
      systems.insert(system);
    }
    if systems.is_empty() {
      return Err(EngineError::invalid(
        "affected_systems",
        "must name at least one system",
      ));
    }

    Ok(Self {
      id,
      version: 1,
      start_time,
      end_time,
      affected_systems: systems,
      title: None,
      change_type: None,
    })
  }

  pub fn with_title(mut self, title: impl Into<String>) -> Self {
    self.title = Some(title.into());
    self
  }

  pub fn with_change_type(mut self, change_type: ChangeType) -> Self {
    self.change_type = Some(change_type);
    self
  }

  pub fn with_version(mut self, version: u32) -> Result<Self, EngineError> {
    if version == 0 {
      return Err(EngineError::invalid("version", "must be >= 1"));
    }
    self.version = version;
    Ok(self)
  }

  /// New version of this change with a different window; `self` is untouched.
  pub fn rescheduled(
    &self,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
  ) -> Result<Self, EngineError> {
    check_window(start_time, end_time)?;
    let version = self
      .version
      .checked_add(1)
      .ok_or_else(|| EngineError::invalid("version", "overflow"))?;
    Ok(Self {
      version,
      start_time,
      end_time,
      ..self.clone()
    })
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn version(&self) -> u32 {
    self.version
  }

  pub fn start_time(&self) -> DateTime<Utc> {
    self.start_time
  }

  pub fn end_time(&self) -> DateTime<Utc> {
    self.end_time
  }

  pub fn affected_systems(&self) -> &BTreeSet<String> {
    &self.affected_systems
  }

  pub fn title(&self) -> Option<&str> {
    self.title.as_deref()
  }

  pub fn change_type(&self) -> Option<ChangeType> {
    self.change_type
  }
}

fn check_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), EngineError> {
  if start >= end {
    return Err(EngineError::invalid(
      "end_time",
      "must be strictly after start_time",
    ));
  }
  Ok(())
}

// ---------------------------------------------------------------------------
// Approver
// ---------------------------------------------------------------------------

/// One required sign-off. Status only ever moves Pending -> Approved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approver {
  name: String,
  role: Option<String>,
  status: ApprovalStatus,
  approved_at: Option<DateTime<Utc>>,
}

impl Approver {
  pub fn new(name: impl Into<String>, status: ApprovalStatus) -> Result<Self, EngineError> {
    let name = name.into();
    if name.trim().is_empty() {
      return Err(EngineError::invalid("approvers[].name", "must not be empty"));
    }
    Ok(Self {
      name,
      role: None,
      status,
      approved_at: None,
    })
  }

  pub fn pending(name: impl Into<String>) -> Result<Self, EngineError> {
    Self::new(name, ApprovalStatus::Pending)
  }

  pub fn with_role(mut self, role: impl Into<String>) -> Self {
    self.role = Some(role.into());
    self
  }

  /// Records an approval that already happened upstream.
  pub fn with_approved_at(mut self, at: DateTime<Utc>) -> Self {
    self.status = ApprovalStatus::Approved;
    self.approved_at = Some(at);
    self
  }

  /// Pending -> Approved. Fails if the approver already signed off.
  pub fn approve(&mut self, at: DateTime<Utc>) -> Result<(), EngineError> {
    if self.status == ApprovalStatus::Approved {
      return Err(EngineError::transition(&self.name, "already approved"));
    }
    self.status = ApprovalStatus::Approved;
    self.approved_at = Some(at);
    Ok(())
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn role(&self) -> Option<&str> {
    self.role.as_deref()
  }

  pub fn status(&self) -> ApprovalStatus {
    self.status
  }

  pub fn approved_at(&self) -> Option<DateTime<Utc>> {
    self.approved_at
  }

  pub fn is_approved(&self) -> bool {
    self.status == ApprovalStatus::Approved
  }
}

// ---------------------------------------------------------------------------
// Risk assessment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RiskDimension {
  pub kind: DimensionKind,
  pub level: RiskLevel,
}

impl RiskDimension {
  pub fn new(kind: DimensionKind, level: RiskLevel) -> Self {
    Self { kind, level }
  }

  pub fn business_impact(level: RiskLevel) -> Self {
    Self::new(DimensionKind::BusinessImpact, level)
  }

  pub fn technical_risk(level: RiskLevel) -> Self {
    Self::new(DimensionKind::TechnicalRisk, level)
  }

  pub fn security_risk(level: RiskLevel) -> Self {
    Self::new(DimensionKind::SecurityRisk, level)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskFactor {
  pub category: FactorCategory,
  pub description: String,
  pub impact: FactorRating,
  pub probability: FactorRating,
  /// Score assigned by the assessor; wins over the derived one.
  pub risk_score: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MitigationStrategy {
  pub risk: String,
  pub strategy: String,
  pub responsible: String,
  pub status: MitigationStatus,
}

/// Risk assessment attached to one change. Always has at least one dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskAssessment {
  change_id: String,
  dimensions: Vec<RiskDimension>,
  pub factors: Vec<RiskFactor>,
  pub mitigations: Vec<MitigationStrategy>,
  pub approval_required: Vec<String>,
  pub testing_required: bool,
  pub recommendation: Option<Recommendation>,
}

impl RiskAssessment {
  pub fn new(
    change_id: impl Into<String>,
    dimensions: Vec<RiskDimension>,
  ) -> Result<Self, EngineError> {
    let change_id = change_id.into();
    if change_id.trim().is_empty() {
      return Err(EngineError::invalid("change_id", "must not be empty"));
    }
    if dimensions.is_empty() {
      return Err(EngineError::invalid(
        "dimensions",
        "at least one risk dimension is required",
      ));
    }
    Ok(Self {
      change_id,
      dimensions,
      factors: Vec::new(),
      mitigations: Vec::new(),
      approval_required: Vec::new(),
      testing_required: false,
      recommendation: None,
    })
  }

  pub fn change_id(&self) -> &str {
    &self.change_id
  }

  pub fn dimensions(&self) -> &[RiskDimension] {
    &self.dimensions
  }
}

// ---------------------------------------------------------------------------
// Output types (JSON contract — what we emit)
// ---------------------------------------------------------------------------

/// Approved / total / rounded percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApprovalProgress {
  pub approved: u32,
  pub total: u32,
  pub percent: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangeReport {
  pub id: String,
  pub version: u32,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
  pub start_time: String,
  pub end_time: String,
  pub has_conflict: bool,
  pub conflicts_with: Vec<String>,
  pub approvals: ApprovalProgress,
  pub pending_approvers: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub overall_risk: Option<RiskLevel>,
  pub requires_cab_review: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub mitigation: Option<ApprovalProgress>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub top_factor_score: Option<u8>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub approval_required: Vec<String>,
  pub testing_required: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub recommendation: Option<Recommendation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReportSummary {
  pub total_changes: u32,
  pub conflicting: u32,
  pub fully_approved: u32,
  pub cab_review: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
  pub snapshot_id: String,
  pub changes: Vec<ChangeReport>,
  pub summary: ReportSummary,
}

// ---------------------------------------------------------------------------
// CLI stream wrappers
// ---------------------------------------------------------------------------

/// Structured error output for invalid input lines.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub field: Option<String>,
}

impl ErrorOutput {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      error: true,
      message: message.into(),
      field: None,
    }
  }

  pub fn with_field(mut self, field: impl Into<String>) -> Self {
    self.field = Some(field.into());
    self
  }
}

impl From<&EngineError> for ErrorOutput {
  fn from(e: &EngineError) -> Self {
    match e {
      EngineError::InvalidRecord { field, reason } => {
        ErrorOutput::new(reason.clone()).with_field(field.clone())
      }
      EngineError::Json(inner) => ErrorOutput::new(format!("json parse: {}", inner)),
      _ => ErrorOutput::new(e.to_string()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 1, hour, 0, 0).unwrap()
  }

  #[test]
  fn risk_level_parses_loosely() {
    assert_eq!(RiskLevel::from_str_loose("Very Low"), Some(RiskLevel::VeryLow));
    assert_eq!(RiskLevel::from_str_loose("very_high"), Some(RiskLevel::VeryHigh));
    assert_eq!(RiskLevel::from_str_loose("VeryHigh"), Some(RiskLevel::VeryHigh));
    assert_eq!(RiskLevel::from_str_loose("medium"), Some(RiskLevel::Medium));
    assert_eq!(RiskLevel::from_str_loose("extreme"), None);
  }

  #[test]
  fn risk_level_ordinal_matches_order() {
    for (i, level) in RiskLevel::ALL.iter().enumerate() {
      assert_eq!(level.ordinal() as usize, i);
    }
    assert!(RiskLevel::VeryLow < RiskLevel::Low);
    assert!(RiskLevel::High < RiskLevel::VeryHigh);
  }

  #[test]
  fn risk_level_serializes_display_form() {
    let json = serde_json::to_string(&RiskLevel::VeryHigh).unwrap();
    assert_eq!(json, "\"Very High\"");
    let back: RiskLevel = serde_json::from_str("\"very_low\"").unwrap();
    assert_eq!(back, RiskLevel::VeryLow);
    let back: RiskLevel = serde_json::from_str("\"HIGH\"").unwrap();
    assert_eq!(back, RiskLevel::High);
    assert!(serde_json::from_str::<RiskLevel>("\"extreme\"").is_err());
  }

  #[test]
  fn error_output_keeps_field_of_invalid_record() {
    let out = ErrorOutput::from(&EngineError::invalid("end_time", "must be strictly after start_time"));
    assert!(out.error);
    assert_eq!(out.field.as_deref(), Some("end_time"));
    assert_eq!(out.message, "must be strictly after start_time");

    let out = ErrorOutput::from(&EngineError::transition("CTO", "already approved"));
    assert_eq!(out.field, None);
    assert!(out.message.contains("already approved"));
  }

  #[test]
  fn change_record_rejects_inverted_window() {
    let err = ChangeRecord::new("C1", at(4), at(2), ["DB"]).unwrap_err();
    assert!(err.to_string().contains("end_time"));
    let err = ChangeRecord::new("C1", at(2), at(2), ["DB"]).unwrap_err();
    assert!(err.to_string().contains("end_time"));
  }

  #[test]
  fn change_record_rejects_empty_systems_and_id() {
    let none: [&str; 0] = [];
    let err = ChangeRecord::new("C1", at(2), at(4), none).unwrap_err();
    assert!(err.to_string().contains("affected_systems"));
    let err = ChangeRecord::new("C1", at(2), at(4), [""]).unwrap_err();
    assert!(err.to_string().contains("affected_systems"));
    let err = ChangeRecord::new(" ", at(2), at(4), ["DB"]).unwrap_err();
    assert!(err.to_string().contains("id"));
  }

  #[test]
  fn rescheduled_produces_new_version() {
    let original = ChangeRecord::new("C1", at(2), at(4), ["DB", "LB"])
      .unwrap()
      .with_title("memory upgrade");
    let moved = original.rescheduled(at(6), at(8)).unwrap();

    assert_eq!(original.version(), 1);
    assert_eq!(original.start_time(), at(2));
    assert_eq!(moved.version(), 2);
    assert_eq!(moved.id(), "C1");
    assert_eq!(moved.start_time(), at(6));
    assert_eq!(moved.affected_systems(), original.affected_systems());
    assert_eq!(moved.title(), Some("memory upgrade"));

    assert!(original.rescheduled(at(8), at(6)).is_err());
  }

  #[test]
  fn reschedule_at_max_version_fails_instead_of_wrapping() {
    let last = ChangeRecord::new("C1", at(2), at(4), ["DB"])
      .unwrap()
      .with_version(u32::MAX)
      .unwrap();
    let err = last.rescheduled(at(6), at(8)).unwrap_err();
    assert!(matches!(err, EngineError::InvalidRecord { ref field, .. } if field == "version"));
    assert_eq!(last.version(), u32::MAX);
  }

  #[test]
  fn approver_approves_exactly_once() {
    let mut approver = Approver::pending("CTO").unwrap().with_role("executive");
    assert!(!approver.is_approved());

    approver.approve(at(3)).unwrap();
    assert!(approver.is_approved());
    assert_eq!(approver.approved_at(), Some(at(3)));

    let err = approver.approve(at(5)).unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition { .. }));
    assert_eq!(approver.approved_at(), Some(at(3)));
    assert_eq!(approver.status(), ApprovalStatus::Approved);
  }

  #[test]
  fn assessment_requires_a_dimension() {
    let err = RiskAssessment::new("C1", vec![]).unwrap_err();
    assert!(err.to_string().contains("dimensions"));
  }

  #[test]
  fn loose_enum_parsing() {
    assert_eq!(ApprovalStatus::from_str_loose("Approved"), Some(ApprovalStatus::Approved));
    assert_eq!(ApprovalStatus::from_str_loose("rejected"), None);
    assert_eq!(ApprovalStatus::from_str_loose("承認済"), Some(ApprovalStatus::Approved));
    assert_eq!(ApprovalStatus::from_str_loose("未承認"), Some(ApprovalStatus::Pending));
    assert_eq!(MitigationStatus::from_str_loose("In Progress"), Some(MitigationStatus::InProgress));
    assert_eq!(
      Recommendation::from_str_loose("Conditional Approval"),
      Some(Recommendation::ConditionalApproval)
    );
    assert_eq!(ChangeType::from_str_loose("Emergency"), Some(ChangeType::Emergency));
  }
}
