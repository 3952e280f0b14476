//! Paginated fetch of the detailed report.
//!
//! The reports endpoint declares `total_count` and `per_page` on every page;
//! the loop keeps requesting successive pages until the accumulated record
//! count reaches `total_count`. Pagination state is local to each call, so a
//! fetcher invocation can never be corrupted by a previous one. Pages are
//! fetched strictly in sequence with a fixed pause in between (upstream rate
//! limit); a failed request propagates and any pages already fetched are
//! discarded.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use log::debug;

use crate::api::TogglApi;
use crate::endpoints;
use crate::model::{RawTimeEntry, ReportPage};
use crate::window::DateRange;

/// Per-call request parameters for the detailed report endpoint.
#[derive(Debug, Clone)]
pub struct FetchParams {
  /// Sent as `user_agent`, per the reports API terms (the account email).
  pub user_agent: String,
  pub workspace_id: u64,
  /// Pause between successive page requests.
  pub page_pause: Duration,
}

pub fn fetch_detailed_report(
  api: &dyn TogglApi,
  range: &DateRange,
  params: &FetchParams,
) -> Result<Vec<RawTimeEntry>> {
  let mut entries: Vec<RawTimeEntry> = Vec::new();
  let mut acquired: u64 = 0;
  let mut page: u64 = 1;

  loop {
    let query = [
      ("since", range.start.to_string()),
      ("until", range.end.to_string()),
      ("user_agent", params.user_agent.clone()),
      ("workspace_id", params.workspace_id.to_string()),
      ("page", page.to_string()),
    ];

    let value = api.get_json(endpoints::REPORT_DETAILED, &query)?;
    let parsed: ReportPage =
      serde_json::from_value(value).with_context(|| format!("parsing detailed report page {page}"))?;

    if parsed.per_page == 0 {
      bail!("detailed report declared per_page = 0");
    }

    acquired += parsed.data.len() as u64;
    debug!(
      "acquired {}/{} records (page {})",
      acquired, parsed.total_count, page
    );

    if parsed.data.is_empty() && acquired < parsed.total_count {
      // The report shrank while we were paging through it; treat the fetch
      // as failed rather than looping forever.
      bail!(
        "detailed report page {page} was empty with {} of {} records acquired",
        acquired,
        parsed.total_count
      );
    }

    entries.extend(parsed.data);

    if acquired >= parsed.total_count {
      return Ok(entries);
    }

    page += 1;
    std::thread::sleep(params.page_pause);
  }
}
