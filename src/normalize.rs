//! Timestamp parsing and duration derivation.
//!
//! Normalization is total over well-formed entries; a single bad timestamp
//! fails the whole batch rather than silently dropping a row. Entries that
//! end before they start are rejected outright: a negative duration reaching
//! a billing import is worse than a failed report.

use chrono::{DateTime, NaiveDateTime};
use thiserror::Error;

use crate::model::{NormalizedEntry, RawTimeEntry};

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
  #[error("unparseable timestamp {value:?} in entry {description:?}")]
  BadTimestamp { value: String, description: String },

  #[error("entry {description:?} ends before it starts ({start} > {end})")]
  NegativeDuration {
    description: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
  },
}

/// Accepts RFC3339 (what the API emits) and falls back to naive
/// `YYYY-MM-DDTHH:MM[:SS]` forms. Offsets are dropped: day bucketing and
/// durations work on the wall-clock time the entry was recorded with.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.naive_local());
  }

  for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
      return Some(dt);
    }
  }

  None
}

pub fn normalize(raw: &RawTimeEntry) -> Result<NormalizedEntry, NormalizeError> {
  let parse = |value: &str| {
    parse_timestamp(value).ok_or_else(|| NormalizeError::BadTimestamp {
      value: value.to_string(),
      description: raw.description.clone(),
    })
  };

  let start = parse(&raw.start)?;
  let end = parse(&raw.end)?;

  if end < start {
    return Err(NormalizeError::NegativeDuration {
      description: raw.description.clone(),
      start,
      end,
    });
  }

  let duration_minutes = (end - start).num_seconds() as f64 / 60.0;

  Ok(NormalizedEntry {
    client: raw.client.clone(),
    project: raw.project.clone(),
    description: raw.description.clone(),
    user: raw.user.clone(),
    tags: raw.tags.clone(),
    start,
    end,
    duration_minutes,
    duration_hours: duration_minutes / 60.0,
  })
}

pub fn normalize_all(raws: &[RawTimeEntry]) -> Result<Vec<NormalizedEntry>, NormalizeError> {
  raws.iter().map(normalize).collect()
}
