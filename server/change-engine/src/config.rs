//! Engine configuration with sane defaults.

use serde::Deserialize;
use std::path::Path;

use crate::error::EngineError;
use crate::types::RiskLevel;

/// Tunable policy for change evaluation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Overall risk at or above this level requires change advisory board review.
  pub cab_review_threshold: RiskLevel,
  /// Longest allowed change window in hours. `None` disables the check.
  pub max_window_hours: Option<u32>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      cab_review_threshold: RiskLevel::High,
      max_window_hours: None,
    }
  }
}

impl Config {
  /// Load a TOML file; missing keys fall back to defaults.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
    let contents = std::fs::read_to_string(path)?;
    Self::from_toml(&contents)
  }

  pub fn from_toml(contents: &str) -> Result<Self, EngineError> {
    let config: Config = toml::from_str(contents)?;
    if config.max_window_hours == Some(0) {
      return Err(EngineError::config("max_window_hours must be > 0"));
    }
    Ok(config)
  }
}
