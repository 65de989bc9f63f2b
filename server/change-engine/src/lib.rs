//! Change Evaluation Engine — deterministic change-management checks.
//!
//! Detects scheduling conflicts between changes, summarizes approval
//! progress, and rolls risk dimensions up into one overall level.
//!
//! No DB, no network; pure functions over caller-supplied snapshots.

pub mod approval;
pub mod config;
pub mod conflict;
pub mod engine;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod risk;
pub mod schedule;
pub mod store;
pub mod types;

pub use approval::aggregate_approvals;
pub use config::Config;
pub use conflict::has_conflict;
pub use engine::{Engine, Snapshot};
pub use error::EngineError;
pub use risk::roll_up_risk;
pub use store::{ChangeStore, InMemoryStore};
pub use types::{
  ApprovalProgress, ApprovalStatus, Approver, ChangeRecord, EvaluationReport, InboundSnapshot,
  RiskAssessment, RiskDimension, RiskLevel,
};
