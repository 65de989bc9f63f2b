//! Tracing setup for the binary. Logs go to stderr; stdout carries JSON only.

use tracing_subscriber::EnvFilter;

/// `RUST_LOG` when set and valid, otherwise `default_directive`.
pub fn env_filter(default_directive: &str) -> EnvFilter {
  EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(default_directive))
    .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Returns false if one was already set.
pub fn init_logging(default_directive: &str) -> bool {
  tracing_subscriber::fmt()
    .with_env_filter(env_filter(default_directive))
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init()
    .is_ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn invalid_directive_falls_back() {
    // Must not panic on garbage input.
    let filter = env_filter("[[not a directive");
    assert!(!filter.to_string().is_empty());
  }

  #[test]
  fn second_init_is_reported() {
    let _ = init_logging("warn");
    assert!(!init_logging("warn"));
  }
}
