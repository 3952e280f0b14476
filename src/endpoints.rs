//! URL registry for the Toggl v8 API and the reports v2 API.
//!
//! These are plain constants and string-building functions; nothing here
//! issues a request or holds state.

pub const V8_BASE_URL: &str = "https://www.toggl.com/api/v8";
pub const REPORTS_BASE_URL: &str = "https://toggl.com/reports/api/v2";

pub const WORKSPACES: &str = "https://www.toggl.com/api/v8/workspaces";
pub const CLIENTS: &str = "https://www.toggl.com/api/v8/clients";
pub const PROJECTS: &str = "https://www.toggl.com/api/v8/projects";
pub const TIME_ENTRIES: &str = "https://www.toggl.com/api/v8/time_entries";
pub const CURRENT_RUNNING_TIME: &str = "https://www.toggl.com/api/v8/time_entries/current";

pub const REPORT_DETAILED: &str = "https://toggl.com/reports/api/v2/details";
pub const REPORT_SUMMARY: &str = "https://toggl.com/reports/api/v2/summary";
pub const REPORT_WEEKLY: &str = "https://toggl.com/reports/api/v2/weekly";

/// Projects visible in a workspace.
pub fn workspace_projects(workspace_id: u64) -> String {
  format!("{V8_BASE_URL}/workspaces/{workspace_id}/projects")
}

/// Projects attached to a client.
pub fn client_projects(client_id: u64) -> String {
  format!("{V8_BASE_URL}/clients/{client_id}/projects")
}
