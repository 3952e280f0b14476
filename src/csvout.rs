//! CSV persistence for timesheet reports.
//!
//! One timestamped file per call; group columns first (billing codes when
//! coded, client/project names otherwise), then one column per calendar day
//! in ascending order.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use crate::model::TimesheetReport;

/// The effective "now" given an optional override; keeps file naming
/// deterministic in tests.
pub fn effective_now(override_now: Option<DateTime<Local>>) -> DateTime<Local> {
  override_now.unwrap_or_else(Local::now)
}

fn format_hours(h: f64) -> String {
  format!("{:.2}", h)
}

/// Write `report` into `dir` as `timesheet-YYYYmmdd-HHMMSS.csv` and return
/// the path. The directory is created if needed.
pub fn save_timesheet(
  report: &TimesheetReport,
  dir: &Path,
  now_opt: Option<DateTime<Local>>,
) -> Result<PathBuf> {
  std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

  let now = effective_now(now_opt);
  let path = dir.join(format!("timesheet-{}.csv", now.format("%Y%m%d-%H%M%S")));
  let mut writer = csv::Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;

  match report {
    TimesheetReport::Plain(sheet) => {
      let mut header = vec!["client".to_string(), "project".to_string()];
      header.extend(sheet.dates.iter().map(|d| d.to_string()));
      writer.write_record(&header)?;

      for row in &sheet.rows {
        let mut record = vec![row.client.clone(), row.project.clone()];
        record.extend(row.hours.iter().copied().map(format_hours));
        writer.write_record(&record)?;
      }
    }
    TimesheetReport::Coded(sheet) => {
      let mut header = vec![
        "client_code".to_string(),
        "project_code".to_string(),
        "task_code".to_string(),
      ];
      header.extend(sheet.dates.iter().map(|d| d.to_string()));
      writer.write_record(&header)?;

      for row in &sheet.rows {
        let mut record = vec![row.client_code.clone(), row.project_code.clone(), row.task_code.clone()];
        record.extend(row.hours.iter().copied().map(format_hours));
        writer.write_record(&record)?;
      }
    }
  }

  writer.flush()?;
  Ok(path)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::{CodedRow, CodedTimesheet, PivotedTimesheet, TimesheetRow};
  use chrono::{NaiveDate, TimeZone};

  fn dates() -> Vec<NaiveDate> {
    vec![
      NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
      NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
    ]
  }

  fn fixed_now() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).single().unwrap()
  }

  #[test]
  fn coded_csv_has_code_columns_then_dates() {
    let report = TimesheetReport::Coded(CodedTimesheet {
      dates: dates(),
      rows: vec![CodedRow {
        client_code: "C00008".into(),
        project_code: "P00758".into(),
        task_code: "2621".into(),
        hours: vec![1.5, 0.25],
      }],
    });

    let td = tempfile::TempDir::new().unwrap();
    let path = save_timesheet(&report, td.path(), Some(fixed_now())).unwrap();
    assert_eq!(path.file_name().unwrap(), "timesheet-20240201-120000.csv");

    let text = std::fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(
      lines.next().unwrap(),
      "client_code,project_code,task_code,2024-01-01,2024-01-02"
    );
    assert_eq!(lines.next().unwrap(), "C00008,P00758,2621,1.50,0.25");
    assert!(lines.next().is_none());
  }

  #[test]
  fn plain_csv_uses_group_names() {
    let report = TimesheetReport::Plain(PivotedTimesheet {
      dates: dates(),
      rows: vec![TimesheetRow {
        client: "Acme Corp".into(),
        project: "Operations".into(),
        hours: vec![0.0, 8.0],
      }],
    });

    let td = tempfile::TempDir::new().unwrap();
    let path = save_timesheet(&report, td.path(), Some(fixed_now())).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("client,project,2024-01-01,2024-01-02\n"));
    assert!(text.contains("Acme Corp,Operations,0.00,8.00"));
  }

  #[test]
  fn empty_sheet_writes_header_only() {
    let report = TimesheetReport::Plain(PivotedTimesheet {
      dates: dates(),
      rows: Vec::new(),
    });

    let td = tempfile::TempDir::new().unwrap();
    let path = save_timesheet(&report, td.path(), Some(fixed_now())).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 1);
  }

  #[test]
  fn target_directory_is_created() {
    let td = tempfile::TempDir::new().unwrap();
    let nested = td.path().join("reports/out");
    let report = TimesheetReport::Plain(PivotedTimesheet {
      dates: dates(),
      rows: Vec::new(),
    });
    let path = save_timesheet(&report, &nested, Some(fixed_now())).unwrap();
    assert!(path.exists());
  }
}
