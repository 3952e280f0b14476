use anyhow::{Result, bail};
use clap::Parser;
use std::path::PathBuf;

use crate::window::WindowSpec;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Eq, PartialEq)]
pub enum Shape {
  /// Every normalized field per entry, plus the missing-client advisory
  Detailed,
  /// One line per entry: date, client, project, description, durations
  Trimmed,
  /// Date-gridded hours per (client, project), optionally with Intacct codes
  Timesheet,
}

#[derive(Parser, Debug)]
#[command(
    name = "toggl-intacct",
    version,
    about = "Export Toggl time entries as Intacct-ready timesheets (JSON or CSV)",
    long_about = None
)]
pub struct Cli {
  /// Calendar month, e.g. 2024-01
  #[arg(long)]
  pub month: Option<String>,

  /// Custom since (YYYY-MM-DD); must be paired with --until
  #[arg(long, alias = "start")]
  pub since: Option<String>,

  /// Custom until (YYYY-MM-DD, inclusive); must be paired with --since
  #[arg(long, alias = "end")]
  pub until: Option<String>,

  /// Report shape to emit
  #[arg(long, value_enum, default_value_t = Shape::Timesheet)]
  pub report: Shape,

  /// Attach Intacct billing codes to the timesheet (requires the mapping file)
  #[arg(long)]
  pub codes: bool,

  /// Directory to save the timesheet as CSV (default: JSON on stdout)
  #[arg(long)]
  pub out: Option<PathBuf>,

  /// Path to the account config
  #[arg(long, default_value = "config.yml")]
  pub config: PathBuf,

  /// Path to the Intacct code mapping
  #[arg(long, default_value = "code_mapping.yml")]
  pub mapping: PathBuf,

  /// Generate a skeleton code mapping from the account's clients and projects, then exit
  #[arg(long)]
  pub mapping_template: bool,
}

#[derive(Debug)]
pub struct EffectiveConfig {
  pub window: Option<WindowSpec>,
  pub report: Shape,
  pub codes: bool,
  pub out: Option<PathBuf>,
  pub config: PathBuf,
  pub mapping: PathBuf,
  pub mapping_template: bool,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  // Validate window selection; template generation needs no window at all.
  let window = match (&cli.month, &cli.since, &cli.until) {
    (Some(ym), None, None) => Some(WindowSpec::Month { ym: ym.clone() }),
    (None, Some(s), Some(u)) => Some(WindowSpec::SinceUntil {
      since: s.clone(),
      until: u.clone(),
    }),
    (None, None, None) => None,
    _ => bail!("Ambiguous time selection: choose only one of --month | --since/--until"),
  };

  if window.is_none() && !cli.mapping_template {
    bail!("Provide one of --month or (--since AND --until)");
  }

  if cli.out.is_some() && cli.report != Shape::Timesheet {
    bail!("--out only applies to --report timesheet");
  }

  Ok(EffectiveConfig {
    window,
    report: cli.report,
    codes: cli.codes,
    out: cli.out,
    config: cli.config,
    mapping: cli.mapping,
    mapping_template: cli.mapping_template,
  })
}
