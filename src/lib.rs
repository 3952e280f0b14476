//! Export Toggl time entries as Intacct-ready timesheets.
//!
//! The pipeline is fetch (paginated detailed report) → normalize (timestamps
//! and durations) → reshape (dense date grid) → code-map (Intacct billing
//! codes). `report::Toggl` is the facade over the whole thing.

pub mod api;
pub mod cli;
pub mod codes;
pub mod config;
pub mod csvout;
pub mod endpoints;
pub mod fetch;
pub mod model;
pub mod normalize;
pub mod report;
pub mod reshape;
pub mod window;

pub use crate::model::{DetailedReport, PivotedTimesheet, TimesheetReport, TrimmedEntry};
pub use crate::report::Toggl;
