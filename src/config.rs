use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Credentials and tuning knobs loaded from `config.yml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub email: String,
  pub toggl_api_key: String,
  /// Required when the account has more than one workspace.
  #[serde(default)]
  pub workspace_id: Option<u64>,
  #[serde(default = "default_request_timeout_secs")]
  pub request_timeout_secs: u64,
  /// Pause between successive report pages, for the upstream rate limit.
  #[serde(default = "default_page_pause_ms")]
  pub page_pause_ms: u64,
}

fn default_request_timeout_secs() -> u64 {
  30
}

fn default_page_pause_ms() -> u64 {
  1000
}

pub fn load_config(path: &Path) -> Result<Config> {
  let text = std::fs::read_to_string(path).with_context(|| {
    format!(
      "no config file found at {}; please see the docs and create a config.yml file",
      path.display()
    )
  })?;

  serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}
