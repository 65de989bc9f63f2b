//! Normalize inbound JSON into validated entities.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::config::Config;
use crate::error::EngineError;
use crate::types::*;

/// Naive layouts accepted after RFC3339; interpreted as UTC.
const NAIVE_FORMATS: [&str; 4] = [
  "%Y-%m-%dT%H:%M:%S",
  "%Y-%m-%dT%H:%M",
  "%Y-%m-%d %H:%M:%S",
  "%Y-%m-%d %H:%M",
];

/// Parse an RFC3339 or naive local-style timestamp.
pub fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, EngineError> {
  let raw = raw.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Ok(dt.with_timezone(&Utc));
  }
  NAIVE_FORMATS
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    .map(|naive| naive.and_utc())
    .ok_or_else(|| EngineError::invalid(field, &format!("unrecognized timestamp {:?}", raw)))
}

pub fn normalize_change(raw: &InboundChange, config: &Config) -> Result<ChangeRecord, EngineError> {
  let start = parse_timestamp("start_time", &raw.start_time)?;
  let end = parse_timestamp("end_time", &raw.end_time)?;

  let mut record = ChangeRecord::new(raw.id.trim(), start, end, raw.affected_systems.iter().cloned())?;

  if let Some(max_hours) = config.max_window_hours {
    let minutes = (end - start).num_minutes();
    if minutes > i64::from(max_hours) * 60 {
      return Err(EngineError::invalid(
        "end_time",
        &format!("window of {} minutes exceeds {}h limit", minutes, max_hours),
      ));
    }
  }

  if let Some(title) = raw.title.as_deref().filter(|t| !t.trim().is_empty()) {
    record = record.with_title(title);
  }
  if let Some(ty) = &raw.change_type {
    let change_type = ChangeType::from_str_loose(ty)
      .ok_or_else(|| EngineError::invalid("change_type", "expected standard|normal|emergency"))?;
    record = record.with_change_type(change_type);
  }
  if let Some(version) = raw.version {
    record = record.with_version(version)?;
  }
  Ok(record)
}

pub fn normalize_approvers(raw: &InboundApproval) -> Result<Vec<Approver>, EngineError> {
  raw
    .approvers
    .iter()
    .map(|a| {
      let status = ApprovalStatus::from_str_loose(&a.status)
        .ok_or_else(|| EngineError::invalid("approvers[].status", "expected approved|pending"))?;
      let mut approver = Approver::new(a.name.trim(), status)?;
      if let Some(role) = a.role.as_deref().filter(|r| !r.is_empty()) {
        approver = approver.with_role(role);
      }
      // A date on a pending approver is ignored, as is a blank one.
      let approved_at = a.approved_at.as_deref().filter(|d| !d.trim().is_empty());
      if let (ApprovalStatus::Approved, Some(at)) = (status, approved_at) {
        approver = approver.with_approved_at(parse_timestamp("approvers[].approved_at", at)?);
      }
      Ok(approver)
    })
    .collect()
}

fn parse_level(field: &str, raw: &str) -> Result<RiskLevel, EngineError> {
  RiskLevel::from_str_loose(raw)
    .ok_or_else(|| EngineError::invalid(field, "expected very low|low|medium|high|very high"))
}

pub fn normalize_assessment(raw: &InboundAssessment) -> Result<RiskAssessment, EngineError> {
  let axes = [
    (DimensionKind::BusinessImpact, "business_impact", &raw.business_impact),
    (DimensionKind::TechnicalRisk, "technical_risk", &raw.technical_risk),
    (DimensionKind::SecurityRisk, "security_risk", &raw.security_risk),
  ];
  let mut dimensions = Vec::with_capacity(axes.len());
  for (kind, field, value) in axes {
    if let Some(v) = value {
      dimensions.push(RiskDimension::new(kind, parse_level(field, v)?));
    }
  }

  let mut assessment = RiskAssessment::new(raw.change_id.trim(), dimensions)?;

  assessment.factors = raw
    .factors
    .iter()
    .map(|f| {
      Ok(RiskFactor {
        category: FactorCategory::from_str_loose(&f.category).ok_or_else(|| {
          EngineError::invalid(
            "factors[].category",
            "expected technical|business|security|operational",
          )
        })?,
        description: f.description.clone(),
        impact: FactorRating::from_str_loose(&f.impact)
          .ok_or_else(|| EngineError::invalid("factors[].impact", "expected low|medium|high"))?,
        probability: FactorRating::from_str_loose(&f.probability).ok_or_else(|| {
          EngineError::invalid("factors[].probability", "expected low|medium|high")
        })?,
        risk_score: match f.risk_score {
          Some(0) => return Err(EngineError::invalid("factors[].risk_score", "must be >= 1")),
          other => other,
        },
      })
    })
    .collect::<Result<Vec<_>, EngineError>>()?;

  assessment.mitigations = raw
    .mitigations
    .iter()
    .map(|m| {
      Ok(MitigationStrategy {
        risk: m.risk.clone(),
        strategy: m.strategy.clone(),
        responsible: m.responsible.clone(),
        status: MitigationStatus::from_str_loose(&m.status).ok_or_else(|| {
          EngineError::invalid(
            "mitigations[].status",
            "expected planned|in progress|completed",
          )
        })?,
      })
    })
    .collect::<Result<Vec<_>, EngineError>>()?;

  assessment.approval_required = raw
    .approval_required
    .iter()
    .map(|s| s.trim().to_string())
    .filter(|s| !s.is_empty())
    .collect();
  assessment.testing_required = raw.testing_required;
  assessment.recommendation = match &raw.recommendation {
    Some(r) => Some(Recommendation::from_str_loose(r).ok_or_else(|| {
      EngineError::invalid(
        "recommendation",
        "expected approve|conditional approval|reject|more information needed",
      )
    })?),
    None => None,
  };

  Ok(assessment)
}
