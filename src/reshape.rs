//! Pivot normalized entries into a date-gridded timesheet.
//!
//! Grouping is by (client, project); each group's hours are bucketed by the
//! calendar day of the entry's start and summed. The column set is always
//! the full closed query range: a day with zero tracked hours appears as an
//! explicit 0.0 column, never goes missing. Downstream billing import
//! requires exactly one column per calendar day.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::model::{NormalizedEntry, PivotedTimesheet, TimesheetRow};
use crate::window::DateRange;

pub fn reshape(entries: &[NormalizedEntry], range: &DateRange) -> PivotedTimesheet {
  let dates = range.days();
  let column: BTreeMap<NaiveDate, usize> = dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();

  // BTreeMap keeps rows sorted by (client, project). Entries without a
  // client or project are grouped under the empty name rather than dropped;
  // the code mapper will then fail loudly instead of losing their hours.
  let mut groups: BTreeMap<(String, String), Vec<f64>> = BTreeMap::new();

  for entry in entries {
    let key = (
      entry.client.clone().unwrap_or_default(),
      entry.project.clone().unwrap_or_default(),
    );
    let row = groups.entry(key).or_insert_with(|| vec![0.0; dates.len()]);

    if let Some(&i) = column.get(&entry.start.date()) {
      row[i] += entry.duration_hours;
    }
  }

  let rows = groups
    .into_iter()
    .map(|((client, project), hours)| TimesheetRow { client, project, hours })
    .collect();

  PivotedTimesheet { dates, rows }
}
