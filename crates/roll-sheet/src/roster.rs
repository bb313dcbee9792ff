//! Roster import: workbook rows → [`NewParticipant`]s.

use std::{collections::HashSet, path::Path};

use calamine::{Data, Reader as _, open_workbook_auto};
use roll_core::participant::NewParticipant;

use crate::{Error, Result};

/// Extensions accepted for upload, compared case-insensitively.
const EXTENSIONS: [&str; 2] = [".xlsx", ".xls"];

/// Whether `file_name` looks like a workbook we can read.
pub fn is_spreadsheet_name(file_name: &str) -> bool {
  let lower = file_name.to_ascii_lowercase();
  EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Read the first worksheet of the workbook at `path`.
///
/// The format is detected from the extension (`.xlsx`, `.xls`, `.xlsb`,
/// `.ods`).
pub fn read_roster(path: impl AsRef<Path>) -> Result<Vec<NewParticipant>> {
  let mut workbook = open_workbook_auto(path)?;
  let range = workbook
    .worksheet_range_at(0)
    .ok_or_else(|| Error::Validation("spreadsheet contains no worksheets".into()))??;

  roster_from_rows(
    range
      .rows()
      .map(|row| row.iter().map(cell_text).collect::<Vec<_>>()),
  )
}

/// Extract a roster from decoded rows; the first row is the header.
///
/// Rows missing either cell are dropped. A repeated email keeps its first
/// row. Output preserves row order.
pub fn roster_from_rows(
  rows: impl IntoIterator<Item = Vec<String>>,
) -> Result<Vec<NewParticipant>> {
  let mut rows = rows.into_iter();
  let header = rows
    .next()
    .ok_or_else(|| Error::Validation("spreadsheet is empty".into()))?;
  let columns = Columns::locate(&header)?;

  let mut seen = HashSet::new();
  let mut roster = Vec::new();

  for row in rows {
    let cell = |i: usize| row.get(i).map(String::as_str).unwrap_or_default();
    let entry = NewParticipant::new(cell(columns.name), cell(columns.email));
    if entry.is_complete() && seen.insert(entry.email.clone()) {
      roster.push(entry);
    }
  }

  Ok(roster)
}

// ─── Header matching ─────────────────────────────────────────────────────────

struct Columns {
  name:  usize,
  email: usize,
}

impl Columns {
  /// A header containing "name" marks the name column; failing that, one
  /// containing "mail" (which covers "email" and "e-mail") marks the email
  /// column. When several headers qualify, the rightmost wins.
  fn locate(header: &[String]) -> Result<Self> {
    let mut name = None;
    let mut email = None;

    for (i, h) in header.iter().enumerate() {
      let h = h.trim().to_lowercase();
      if h.contains("name") {
        name = Some(i);
      } else if h.contains("mail") {
        email = Some(i);
      }
    }

    match (name, email) {
      (Some(name), Some(email)) => Ok(Self { name, email }),
      _ => Err(Error::Validation(
        "spreadsheet must contain 'name' and 'email' columns".into(),
      )),
    }
  }
}

fn cell_text(cell: &Data) -> String {
  match cell {
    Data::Empty => String::new(),
    other => other.to_string(),
  }
}
