//! Error types for the roll-sheet codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The workbook opened but its content cannot be used as a roster.
  #[error("{0}")]
  Validation(String),

  /// The file is not a readable workbook.
  #[error("error processing spreadsheet: {0}")]
  Parse(#[from] calamine::Error),

  #[error("error writing spreadsheet: {0}")]
  Write(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
