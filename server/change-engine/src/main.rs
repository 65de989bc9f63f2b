//! Binary entrypoint: read JSON lines from stdin, write JSON lines to stdout.
//!
//! Each input line is an InboundSnapshot. Each output line is either:
//! - An EvaluationReport (when the snapshot is valid)
//! - An ErrorOutput (when parsing or validation fails)

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use change_engine::types::ErrorOutput;
use change_engine::{logging, Config, Engine};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(
  name = "change-engine",
  about = "Evaluate change schedules for conflicts, approvals and risk"
)]
struct Cli {
  /// TOML config file; defaults apply when omitted.
  #[arg(short, long)]
  config: Option<PathBuf>,
  /// Pretty-print each output object.
  #[arg(long)]
  pretty: bool,
  /// Log filter used when RUST_LOG is unset.
  #[arg(long, default_value = "info")]
  log: String,
}

fn main() {
  let cli = Cli::parse();
  logging::init_logging(&cli.log);

  if let Err(e) = run(&cli) {
    let _ = writeln!(io::stderr(), "change-engine error: {:#}", e);
    std::process::exit(1);
  }
}

fn run(cli: &Cli) -> Result<()> {
  let config = match &cli.config {
    Some(path) => Config::load(path)
      .with_context(|| format!("loading config {}", path.display()))?,
    None => Config::default(),
  };
  info!(cab_review_threshold = %config.cab_review_threshold, "change-engine ready");
  let engine = Engine::new(config);

  let stdin = io::stdin();
  let stdout = io::stdout();
  let mut out = io::BufWriter::new(stdout.lock());

  for (lineno, line) in stdin.lock().lines().enumerate() {
    let line = line.context("reading stdin")?;

    // Skip blank lines.
    let trimmed = line.trim();
    if trimmed.is_empty() {
      continue;
    }

    match engine.process_line(trimmed) {
      Ok(report) => emit(&mut out, &report, cli.pretty)?,
      Err(e) => {
        warn!(line = lineno + 1, error = %e, "rejected snapshot");
        emit(&mut out, &ErrorOutput::from(&e), cli.pretty)?;
      }
    }
  }

  out.flush().context("flushing stdout")?;
  Ok(())
}

fn emit<W: Write, T: Serialize>(out: &mut W, value: &T, pretty: bool) -> Result<()> {
  if pretty {
    serde_json::to_writer_pretty(&mut *out, value)?;
  } else {
    serde_json::to_writer(&mut *out, value)?;
  }
  writeln!(out)?;
  Ok(())
}
