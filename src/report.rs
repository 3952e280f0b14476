//! Report facade: composes fetch → normalize → reshape → code-map into the
//! three public report shapes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use log::{info, warn};

use crate::api::{TogglApi, TogglHttpApi};
use crate::codes::{self, CodeMapping};
use crate::config::Config;
use crate::endpoints;
use crate::fetch::{FetchParams, fetch_detailed_report};
use crate::model::{
  DetailedReport, MissingClientEntry, Named, NormalizedEntry, TimesheetReport, TrimmedEntry,
};
use crate::normalize::normalize_all;
use crate::reshape::reshape;
use crate::window::DateRange;

pub struct Toggl {
  api: Box<dyn TogglApi>,
  user_agent: String,
  workspace_id: u64,
  page_pause: Duration,
  mapping_path: PathBuf,
}

impl std::fmt::Debug for Toggl {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Toggl")
      .field("user_agent", &self.user_agent)
      .field("workspace_id", &self.workspace_id)
      .field("page_pause", &self.page_pause)
      .field("mapping_path", &self.mapping_path)
      .finish_non_exhaustive()
  }
}

impl Toggl {
  /// Build against the live API. Resolves the workspace up front, so a
  /// misconfigured account fails here rather than mid-report.
  pub fn from_config(cfg: &Config, mapping_path: PathBuf) -> Result<Self> {
    let api = Box::new(TogglHttpApi::new(
      &cfg.toggl_api_key,
      Duration::from_secs(cfg.request_timeout_secs),
    ));
    Self::with_api(api, cfg, mapping_path)
  }

  /// Same as `from_config` but with an injected transport.
  pub fn with_api(api: Box<dyn TogglApi>, cfg: &Config, mapping_path: PathBuf) -> Result<Self> {
    let workspace_id = resolve_workspace(api.as_ref(), cfg.workspace_id)?;

    Ok(Toggl {
      api,
      user_agent: cfg.email.clone(),
      workspace_id,
      page_pause: Duration::from_millis(cfg.page_pause_ms),
      mapping_path,
    })
  }

  pub fn workspace_id(&self) -> u64 {
    self.workspace_id
  }

  fn fetch_params(&self) -> FetchParams {
    FetchParams {
      user_agent: self.user_agent.clone(),
      workspace_id: self.workspace_id,
      page_pause: self.page_pause,
    }
  }

  /// Normalized entries plus the missing-client advisory. Entries without a
  /// client stay in the result.
  pub fn detailed_report(&self, range: &DateRange) -> Result<DetailedReport> {
    let raws = fetch_detailed_report(self.api.as_ref(), range, &self.fetch_params())?;
    let entries = normalize_all(&raws)?;

    let missing_client = missing_client_entries(&entries);
    if !missing_client.is_empty() {
      warn!(
        "{} entries have no client attached upstream; they are kept in the report",
        missing_client.len()
      );
    }

    Ok(DetailedReport {
      entries,
      missing_client,
    })
  }

  /// Detailed report narrowed to the columns worth reading.
  pub fn trimmed_report(&self, range: &DateRange) -> Result<Vec<TrimmedEntry>> {
    let detailed = self.detailed_report(range)?;
    Ok(detailed.entries.iter().map(TrimmedEntry::from).collect())
  }

  /// Date-gridded timesheet, optionally with Intacct billing codes. The
  /// mapping file is loaded fresh on every coded call; a mapping gap fails
  /// the report after the complete diagnostic has been logged.
  pub fn timesheet_report(&self, range: &DateRange, with_codes: bool) -> Result<TimesheetReport> {
    let detailed = self.detailed_report(range)?;
    let sheet = reshape(&detailed.entries, range);

    if !with_codes {
      return Ok(TimesheetReport::Plain(sheet));
    }

    let mapping = CodeMapping::load(&self.mapping_path)?;
    info!("loaded code mapping ({} clients)", mapping.clients.len());

    match codes::apply_codes(&sheet, &mapping) {
      Ok(coded) => Ok(TimesheetReport::Coded(coded)),
      Err(gap) => {
        warn!("{gap}");
        Err(gap.into())
      }
    }
  }

  /// Fetch the account's clients and each client's projects, and build a
  /// skeleton code mapping with placeholder codes.
  pub fn mapping_template(&self) -> Result<CodeMapping> {
    let clients: Vec<Named> = self.get_named_list(endpoints::CLIENTS)?;

    let mut clients_with_projects: Vec<(String, Vec<String>)> = Vec::with_capacity(clients.len());
    for client in clients {
      let projects: Vec<Named> = self.get_named_list(&endpoints::client_projects(client.id))?;
      clients_with_projects.push((client.name, projects.into_iter().map(|p| p.name).collect()));
    }

    Ok(codes::mapping_template(&clients_with_projects))
  }

  /// Write the template to `path`. Refuses to overwrite an existing mapping
  /// file; either use it or delete it first.
  pub fn write_mapping_template(&self, path: &Path) -> Result<()> {
    if path.exists() {
      bail!(
        "found an existing {}; either use it or delete it and run this again",
        path.display()
      );
    }

    let template = self.mapping_template()?;
    let yml = serde_yaml::to_string(&template)?;
    std::fs::write(path, yml).with_context(|| format!("writing {}", path.display()))?;
    info!("generated a mapping template at {}", path.display());
    Ok(())
  }

  fn get_named_list(&self, endpoint: &str) -> Result<Vec<Named>> {
    let value = self.api.get_json(endpoint, &[])?;
    // The v8 API returns null instead of [] for clients with no projects.
    if value.is_null() {
      return Ok(Vec::new());
    }
    serde_json::from_value(value).with_context(|| format!("parsing {{id, name}} list from {endpoint}"))
  }
}

/// Advisory rows for entries lacking a client: date, description, duration.
fn missing_client_entries(entries: &[NormalizedEntry]) -> Vec<MissingClientEntry> {
  entries
    .iter()
    .filter(|e| e.client.is_none())
    .map(|e| MissingClientEntry {
      date: e.start.date(),
      description: e.description.clone(),
      duration_hours: e.duration_hours,
    })
    .collect()
}

/// Pick the workspace: an explicit `workspace_id` wins; otherwise the
/// account must have exactly one workspace. Silently picking one of several
/// risks reporting against the wrong data, so ambiguity is a configuration
/// error.
fn resolve_workspace(api: &dyn TogglApi, configured: Option<u64>) -> Result<u64> {
  if let Some(id) = configured {
    return Ok(id);
  }

  let value = api.get_json(endpoints::WORKSPACES, &[])?;
  let workspaces: Vec<Named> = serde_json::from_value(value).context("parsing workspace list")?;

  match workspaces.as_slice() {
    [] => bail!("your account has no workspaces; cannot run reports"),
    [only] => Ok(only.id),
    many => bail!(
      "your account has {} workspaces; set workspace_id in config.yml to pick one",
      many.len()
    ),
  }
}
