use anyhow::{Context, Result};
use clap::Parser;

use toggl_intacct::cli::{Cli, Shape, normalize};
use toggl_intacct::report::Toggl;
use toggl_intacct::{config, csvout, window};

fn main() -> Result<()> {
  env_logger::init();

  // Phase 1: normalize CLI
  let cfg = normalize(Cli::parse())?;

  // Phase 2: account config and workspace resolution
  let account = config::load_config(&cfg.config)?;
  let toggl = Toggl::from_config(&account, cfg.mapping.clone())?;

  if cfg.mapping_template {
    return toggl.write_mapping_template(&cfg.mapping);
  }

  // normalize() guarantees a window when we are not templating
  let window = cfg.window.context("no reporting window selected")?;
  let range = window::resolve_window(&window)?;

  // Phase 3: run the selected report
  match cfg.report {
    Shape::Detailed => print_json(&toggl.detailed_report(&range)?),
    Shape::Trimmed => print_json(&toggl.trimmed_report(&range)?),
    Shape::Timesheet => {
      let report = toggl.timesheet_report(&range, cfg.codes)?;
      match &cfg.out {
        Some(dir) => {
          let path = csvout::save_timesheet(&report, dir, None)?;
          println!("{}", path.display());
          Ok(())
        }
        None => print_json(&report),
      }
    }
  }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
