//! Spreadsheet codec for Roll.
//!
//! Reads participant rosters out of uploaded workbooks and writes the
//! attendance report. Pure synchronous; no HTTP or database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! let roster = roll_sheet::read_roster("uploads/guests.xlsx").unwrap();
//! println!("{} participants", roster.len());
//! ```

pub mod error;
mod report;
mod roster;

pub use error::{Error, Result};
pub use report::{REPORT_HEADERS, REPORT_SHEET, render_report, write_report};
pub use roster::{is_spreadsheet_name, read_roster, roster_from_rows};
