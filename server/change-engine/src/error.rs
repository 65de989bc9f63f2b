//! Structured error types for the change engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("invalid record: {field}: {reason}")]
  InvalidRecord { field: String, reason: String },

  #[error("invalid transition: {name}: {reason}")]
  InvalidTransition { name: String, reason: String },

  #[error("config: {0}")]
  Config(String),

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),

  #[error("toml: {0}")]
  Toml(#[from] toml::de::Error),

  #[error("io: {0}")]
  Io(#[from] std::io::Error),
}

impl EngineError {
  pub fn invalid(field: &str, reason: &str) -> Self {
    Self::InvalidRecord {
      field: field.to_string(),
      reason: reason.to_string(),
    }
  }

  pub fn transition(name: &str, reason: &str) -> Self {
    Self::InvalidTransition {
      name: name.to_string(),
      reason: reason.to_string(),
    }
  }

  pub fn config(msg: impl Into<String>) -> Self {
    Self::Config(msg.into())
  }
}
