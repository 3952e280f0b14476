//! Intacct billing-code mapping.
//!
//! The mapping file is user-maintained YAML keyed by client human name:
//!
//! ```yaml
//! Acme Corp:
//!   intacct_client: C00008
//!   Operations:
//!     intacct_project: P00758
//!     intacct_task: "2621"
//! ```
//!
//! Intacct has a Customer > Project > Task hierarchy while Toggl has
//! Client > Project, so each Toggl project maps to two Intacct codes. Lookups
//! are typed with an explicit not-found result; a gap never panics, it feeds
//! the diagnostic instead.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{CodedRow, CodedTimesheet, PivotedTimesheet};

pub const DEFAULT_MAPPING_FILENAME: &str = "code_mapping.yml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectCodes {
  pub intacct_project: String,
  pub intacct_task: String,
}

/// One client block: its Intacct customer code plus every mapped project.
/// The flatten captures the project-name keys sitting next to
/// `intacct_client` in the YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientCodes {
  pub intacct_client: String,
  #[serde(flatten)]
  pub projects: BTreeMap<String, ProjectCodes>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeMapping {
  pub clients: BTreeMap<String, ClientCodes>,
}

/// Every unmapped name found in the input, gathered in one pass so the
/// mapping file can be fixed in one edit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingGap {
  pub missing_clients: BTreeSet<String>,
  pub missing_projects: BTreeSet<String>,
}

impl fmt::Display for MappingGap {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "code mapping file is missing entries for")?;
    if !self.missing_clients.is_empty() {
      let names: Vec<&str> = self.missing_clients.iter().map(String::as_str).collect();
      write!(f, " {} client(s): {}", names.len(), names.join(", "))?;
    }
    if !self.missing_projects.is_empty() {
      if !self.missing_clients.is_empty() {
        write!(f, " and")?;
      }
      let names: Vec<&str> = self.missing_projects.iter().map(String::as_str).collect();
      write!(f, " {} project(s): {}", names.len(), names.join(", "))?;
    }
    write!(f, "; please add them and try again")
  }
}

impl std::error::Error for MappingGap {}

impl CodeMapping {
  pub fn load(path: &Path) -> Result<Self> {
    let text = std::fs::read_to_string(path).with_context(|| {
      format!(
        "no code mapping file found at {}; please see the docs and create a {DEFAULT_MAPPING_FILENAME} file",
        path.display()
      )
    })?;

    serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
  }

  /// Both codes for a (client, project) pair, or None on any missing key.
  pub fn lookup(&self, client: &str, project: &str) -> Option<(&str, &ProjectCodes)> {
    let entry = self.clients.get(client)?;
    let codes = entry.projects.get(project)?;
    Some((entry.intacct_client.as_str(), codes))
  }

  pub fn client_names(&self) -> BTreeSet<&str> {
    self.clients.keys().map(String::as_str).collect()
  }

  /// Project names mapped under any client.
  pub fn project_names(&self) -> BTreeSet<&str> {
    self
      .clients
      .values()
      .flat_map(|c| c.projects.keys().map(String::as_str))
      .collect()
  }
}

/// Attach the three billing codes to every row, or fail with the complete
/// gap diagnostic. Never returns a partially-coded table.
pub fn apply_codes(sheet: &PivotedTimesheet, mapping: &CodeMapping) -> Result<CodedTimesheet, MappingGap> {
  let mut gap = MappingGap::default();
  let mut rows: Vec<CodedRow> = Vec::with_capacity(sheet.rows.len());

  for row in &sheet.rows {
    match mapping.lookup(&row.client, &row.project) {
      Some((client_code, codes)) => rows.push(CodedRow {
        client_code: client_code.to_string(),
        project_code: codes.intacct_project.clone(),
        task_code: codes.intacct_task.clone(),
        hours: row.hours.clone(),
      }),
      None => {
        if !mapping.clients.contains_key(&row.client) {
          gap.missing_clients.insert(row.client.clone());
        }
        if mapping
          .clients
          .get(&row.client)
          .map_or(true, |c| !c.projects.contains_key(&row.project))
        {
          gap.missing_projects.insert(row.project.clone());
        }
      }
    }
  }

  if gap != MappingGap::default() {
    return Err(gap);
  }

  Ok(CodedTimesheet {
    dates: sheet.dates.clone(),
    rows,
  })
}

/// Skeleton mapping built from the live client/project lists, with
/// placeholder codes for the user to fill in.
pub fn mapping_template(clients_with_projects: &[(String, Vec<String>)]) -> CodeMapping {
  let clients = clients_with_projects
    .iter()
    .map(|(client, projects)| {
      let projects = projects
        .iter()
        .map(|p| {
          (
            p.clone(),
            ProjectCodes {
              intacct_project: "PROJECT_CODE".into(),
              intacct_task: "TASK_CODE".into(),
            },
          )
        })
        .collect();
      (
        client.clone(),
        ClientCodes {
          intacct_client: "CLIENT_CODE".into(),
          projects,
        },
      )
    })
    .collect();

  CodeMapping { clients }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::TimesheetRow;
  use chrono::NaiveDate;

  const MAPPING_YML: &str = "\
Acme Corp:
  intacct_client: C00008
  Operations:
    intacct_project: P00758
    intacct_task: '2621'
  Research:
    intacct_project: P00760
    intacct_task: '2640'
Globex:
  intacct_client: C00011
  Migration:
    intacct_project: P00900
    intacct_task: '2700'
";

  fn mapping() -> CodeMapping {
    serde_yaml::from_str(MAPPING_YML).unwrap()
  }

  fn sheet(rows: Vec<(&str, &str)>) -> PivotedTimesheet {
    PivotedTimesheet {
      dates: vec![NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()],
      rows: rows
        .into_iter()
        .map(|(c, p)| TimesheetRow {
          client: c.into(),
          project: p.into(),
          hours: vec![1.0],
        })
        .collect(),
    }
  }

  #[test]
  fn yaml_parses_into_typed_mapping() {
    let m = mapping();
    assert_eq!(m.clients.len(), 2);
    let acme = &m.clients["Acme Corp"];
    assert_eq!(acme.intacct_client, "C00008");
    assert_eq!(acme.projects["Operations"].intacct_project, "P00758");
    assert_eq!(acme.projects["Operations"].intacct_task, "2621");
  }

  #[test]
  fn reloading_is_idempotent() {
    let td = tempfile::TempDir::new().unwrap();
    let p = td.path().join("code_mapping.yml");
    std::fs::write(&p, MAPPING_YML).unwrap();

    let first = CodeMapping::load(&p).unwrap();
    let second = CodeMapping::load(&p).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn load_missing_file_mentions_the_expected_name() {
    let err = CodeMapping::load(Path::new("no_such_mapping.yml")).unwrap_err();
    assert!(format!("{:#}", err).contains("code_mapping.yml"));
  }

  #[test]
  fn lookup_returns_all_three_codes() {
    let m = mapping();
    let (client_code, codes) = m.lookup("Acme Corp", "Research").unwrap();
    assert_eq!(client_code, "C00008");
    assert_eq!(codes.intacct_project, "P00760");
    assert_eq!(codes.intacct_task, "2640");
  }

  #[test]
  fn lookup_is_none_for_project_under_wrong_client() {
    let m = mapping();
    assert!(m.lookup("Globex", "Operations").is_none());
  }

  #[test]
  fn apply_codes_codes_every_row() {
    let coded = apply_codes(&sheet(vec![("Acme Corp", "Operations"), ("Globex", "Migration")]), &mapping()).unwrap();
    assert_eq!(coded.rows.len(), 2);
    assert_eq!(coded.rows[0].client_code, "C00008");
    assert_eq!(coded.rows[1].project_code, "P00900");
    assert_eq!(coded.rows[1].task_code, "2700");
    assert_eq!(coded.rows[0].hours, vec![1.0]);
  }

  #[test]
  fn unknown_client_fails_with_its_name_in_the_diagnostic() {
    let err = apply_codes(&sheet(vec![("Acme Corp", "Operations"), ("B", "Anything")]), &mapping()).unwrap_err();
    assert!(err.missing_clients.contains("B"));
    assert!(err.missing_projects.contains("Anything"));
  }

  #[test]
  fn diagnostic_gathers_every_gap_in_one_pass() {
    let err = apply_codes(
      &sheet(vec![("Nope", "P1"), ("Also Nope", "P2"), ("Acme Corp", "Unmapped")]),
      &mapping(),
    )
    .unwrap_err();

    assert_eq!(err.missing_clients.len(), 2);
    assert!(err.missing_clients.contains("Nope"));
    assert!(err.missing_clients.contains("Also Nope"));
    assert!(err.missing_projects.contains("Unmapped"));

    let msg = err.to_string();
    assert!(msg.contains("2 client(s)"));
    assert!(msg.contains("Unmapped"));
  }

  #[test]
  fn no_partial_table_on_failure() {
    // One good row, one bad: the whole operation fails.
    let res = apply_codes(&sheet(vec![("Acme Corp", "Operations"), ("B", "P")]), &mapping());
    assert!(res.is_err());
  }

  #[test]
  fn name_sets_cover_all_clients_and_projects() {
    let m = mapping();
    assert_eq!(m.client_names(), ["Acme Corp", "Globex"].into_iter().collect());
    assert_eq!(
      m.project_names(),
      ["Operations", "Research", "Migration"].into_iter().collect()
    );
  }

  #[test]
  fn template_round_trips_through_yaml() {
    let t = mapping_template(&[
      ("Acme Corp".to_string(), vec!["Operations".to_string()]),
      ("Globex".to_string(), Vec::new()),
    ]);
    let yml = serde_yaml::to_string(&t).unwrap();
    let back: CodeMapping = serde_yaml::from_str(&yml).unwrap();
    assert_eq!(back.clients["Acme Corp"].intacct_client, "CLIENT_CODE");
    assert_eq!(
      back.clients["Acme Corp"].projects["Operations"].intacct_project,
      "PROJECT_CODE"
    );
    assert!(back.clients["Globex"].projects.is_empty());
  }
}
