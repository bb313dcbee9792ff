//! Attendance report: [`AttendanceRecord`]s → xlsx workbook.

use std::path::{Path, PathBuf};

use roll_core::attendance::{AttendanceRecord, format_entry_time};
use rust_xlsxwriter::{Format, Workbook};
use uuid::Uuid;

use crate::Result;

pub const REPORT_SHEET: &str = "Attendance Report";

pub const REPORT_HEADERS: [&str; 3] = ["Name", "Email", "Entry Time"];

/// Render the report to an in-memory xlsx file.
pub fn render_report(records: &[AttendanceRecord]) -> Result<Vec<u8>> {
  Ok(build(records)?.save_to_buffer()?)
}

/// Write the report into `dir` under a fresh `attendance_<hex>.xlsx` name and
/// return its path. The caller owns the file afterwards.
pub fn write_report(records: &[AttendanceRecord], dir: &Path) -> Result<PathBuf> {
  let suffix = Uuid::new_v4().simple().to_string();
  let path = dir.join(format!("attendance_{}.xlsx", &suffix[..8]));
  build(records)?.save(&path)?;
  Ok(path)
}

/// One header row, then one row per record in the order given.
fn build(records: &[AttendanceRecord]) -> Result<Workbook> {
  let mut workbook = Workbook::new();
  let bold = Format::new().set_bold();

  let sheet = workbook.add_worksheet();
  sheet.set_name(REPORT_SHEET)?;

  for (col, header) in (0u16..).zip(REPORT_HEADERS) {
    sheet.write_string_with_format(0, col, header, &bold)?;
  }

  for (row, record) in (1u32..).zip(records) {
    sheet.write_string(row, 0, &record.name)?;
    sheet.write_string(row, 1, &record.email)?;
    sheet.write_string(row, 2, format_entry_time(record.entry_time))?;
  }

  sheet.set_column_width(0, 28)?;
  sheet.set_column_width(1, 36)?;
  sheet.set_column_width(2, 20)?;

  Ok(workbook)
}
