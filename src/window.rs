use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Date-window types live here to keep main focused.

/// Closed range of calendar days; both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
  pub start: NaiveDate,
  pub end: NaiveDate,
}

impl DateRange {
  pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
    if end < start {
      bail!("invalid date range: {end} is before {start}");
    }
    Ok(DateRange { start, end })
  }

  /// Every calendar day in the range, ascending. This is the column grid the
  /// reshaper reindexes against.
  pub fn days(&self) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut cur = self.start;
    while cur <= self.end {
      out.push(cur);
      // succ_opt only fails at the end of representable time
      cur = match cur.succ_opt() {
        Some(next) => next,
        None => break,
      };
    }
    out
  }
}

#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum WindowSpec {
  Month { ym: String },
  SinceUntil { since: String, until: String },
}

/// First and last day of a `YYYY-MM` month.
pub fn month_bounds(year_month: &str) -> Result<DateRange> {
  let parts: Vec<&str> = year_month.split('-').collect();

  if parts.len() != 2 {
    bail!("invalid --month, expected YYYY-MM");
  }
  let y: i32 = parts[0].parse().context("parsing year in --month")?;
  let m: u32 = parts[1].parse().context("parsing month in --month")?;

  if !(1..=12).contains(&m) {
    bail!("invalid month in --month");
  }
  let (next_y, next_m) = if m == 12 { (y + 1, 1) } else { (y, m + 1) };

  let start = NaiveDate::from_ymd_opt(y, m, 1).context("building first of month")?;
  let end = NaiveDate::from_ymd_opt(next_y, next_m, 1)
    .and_then(|d| d.pred_opt())
    .context("building last of month")?;

  DateRange::new(start, end)
}

fn parse_date(s: &str, what: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("parsing {what} date {s:?}, expected YYYY-MM-DD"))
}

/// Resolve a window selection into the concrete closed date range the report
/// endpoints are queried with.
pub fn resolve_window(window: &WindowSpec) -> Result<DateRange> {
  match window {
    WindowSpec::Month { ym } => month_bounds(ym),
    WindowSpec::SinceUntil { since, until } => {
      DateRange::new(parse_date(since, "--since")?, parse_date(until, "--until")?)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn month_bounds_basic() {
    let r = month_bounds("2025-08").unwrap();
    assert_eq!(r.start, NaiveDate::from_ymd_opt(2025, 8, 1).unwrap());
    assert_eq!(r.end, NaiveDate::from_ymd_opt(2025, 8, 31).unwrap());
  }

  #[test]
  fn month_bounds_december_rolls_year() {
    let r = month_bounds("2024-12").unwrap();
    assert_eq!(r.end, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
  }

  #[test]
  fn month_bounds_invalid_errors() {
    assert!(month_bounds("2025-13").is_err());
    assert!(month_bounds("2025").is_err());
  }

  #[test]
  fn days_are_contiguous_and_inclusive() {
    let r = resolve_window(&WindowSpec::SinceUntil {
      since: "2024-01-01".into(),
      until: "2024-01-03".into(),
    })
    .unwrap();
    let days = r.days();
    assert_eq!(days.len(), 3);
    assert_eq!(days[0], r.start);
    assert_eq!(days[2], r.end);
  }

  #[test]
  fn single_day_range_has_one_column() {
    let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let r = DateRange::new(d, d).unwrap();
    assert_eq!(r.days(), vec![d]);
  }

  #[test]
  fn reversed_range_is_rejected() {
    let a = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let b = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    assert!(DateRange::new(a, b).is_err());
  }
}
