//! Shared data model for the report pipeline: raw API rows, normalized
//! entries, and the pivoted timesheet tables.
//!
//! Everything here is a value produced and consumed inside a single report
//! invocation; nothing holds a reference back into the fetch layer.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One row of the detailed report exactly as the API returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTimeEntry {
  pub client: Option<String>,
  pub project: Option<String>,
  #[serde(default)]
  pub description: String,
  pub start: String,
  pub end: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub user: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub tags: Vec<String>,
}

/// Envelope of one detailed-report page. `total_count` and `per_page` drive
/// the pagination loop in `fetch`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportPage {
  pub total_count: u64,
  pub per_page: u64,
  pub data: Vec<RawTimeEntry>,
}

/// A `{id, name}` pair as returned by the workspace/client/project lookup
/// endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Named {
  pub id: u64,
  pub name: String,
}

/// A raw entry with parsed timestamps and derived durations.
///
/// `duration_hours == duration_minutes / 60` holds by construction; both are
/// non-negative because normalization rejects entries that end before they
/// start.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedEntry {
  pub client: Option<String>,
  pub project: Option<String>,
  pub description: String,
  pub user: Option<String>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub tags: Vec<String>,
  pub start: NaiveDateTime,
  pub end: NaiveDateTime,
  pub duration_minutes: f64,
  pub duration_hours: f64,
}

/// The narrowed report row: just the columns worth reading.
#[derive(Debug, Clone, Serialize)]
pub struct TrimmedEntry {
  pub client: Option<String>,
  pub project: Option<String>,
  pub description: String,
  pub start: NaiveDateTime,
  pub end: NaiveDateTime,
  pub duration_minutes: f64,
  pub duration_hours: f64,
}

impl From<&NormalizedEntry> for TrimmedEntry {
  fn from(e: &NormalizedEntry) -> Self {
    TrimmedEntry {
      client: e.client.clone(),
      project: e.project.clone(),
      description: e.description.clone(),
      start: e.start,
      end: e.end,
      duration_minutes: e.duration_minutes,
      duration_hours: e.duration_hours,
    }
  }
}

/// Advisory row for an entry that has no client attached upstream. The entry
/// itself stays in the report; losing it silently would corrupt billing.
#[derive(Debug, Clone, Serialize)]
pub struct MissingClientEntry {
  pub date: NaiveDate,
  pub description: String,
  pub duration_hours: f64,
}

/// Normalized entries plus the missing-client advisory.
#[derive(Debug, Serialize)]
pub struct DetailedReport {
  pub entries: Vec<NormalizedEntry>,
  pub missing_client: Vec<MissingClientEntry>,
}

/// One group row of a pivoted timesheet. `hours` is index-aligned with the
/// sheet's `dates`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimesheetRow {
  pub client: String,
  pub project: String,
  pub hours: Vec<f64>,
}

/// Date-gridded timesheet: one f64 column per calendar day of the query
/// range, gap-free and zero-filled. Rows are sorted by (client, project).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotedTimesheet {
  pub dates: Vec<NaiveDate>,
  pub rows: Vec<TimesheetRow>,
}

/// A timesheet row with its three Intacct billing codes attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodedRow {
  pub client_code: String,
  pub project_code: String,
  pub task_code: String,
  pub hours: Vec<f64>,
}

/// `PivotedTimesheet` with code columns leading the date columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodedTimesheet {
  pub dates: Vec<NaiveDate>,
  pub rows: Vec<CodedRow>,
}

/// Output of the timesheet facade, with or without billing codes.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum TimesheetReport {
  Plain(PivotedTimesheet),
  Coded(CodedTimesheet),
}
