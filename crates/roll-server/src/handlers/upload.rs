//! `POST /upload`: roster upload and provisioning.
//!
//! The workbook is written to the upload directory under a collision-free
//! name, imported, and removed again whatever the import outcome.

use axum::{
  Json,
  extract::{Multipart, State},
};
use roll_core::store::RegistryStore;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::{
  AppState,
  error::{Error, Result},
};

/// Multipart field carrying the workbook.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
  pub success: bool,
  pub message: String,
  pub added:   usize,
  pub skipped: usize,
}

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  mut multipart: Multipart,
) -> Result<Json<UploadResponse>>
where
  S: RegistryStore + 'static,
{
  let mut upload = None;
  while let Some(field) = multipart.next_field().await? {
    if field.name() != Some(FILE_FIELD) {
      continue;
    }
    let file_name = field.file_name().unwrap_or_default().to_owned();
    let bytes = field.bytes().await?;
    upload = Some((file_name, bytes));
    break;
  }

  let Some((file_name, bytes)) = upload.filter(|(name, _)| !name.trim().is_empty()) else {
    return Err(Error::Validation("No file selected".into()));
  };
  if !roll_sheet::is_spreadsheet_name(&file_name) {
    return Err(Error::Validation(
      "Please upload a valid Excel file (.xlsx or .xls)".into(),
    ));
  }

  let upload_dir = &state.config.upload_dir;
  tokio::fs::create_dir_all(upload_dir).await?;
  let stored = upload_dir.join(format!("{}_{}", Uuid::new_v4(), sanitize_file_name(&file_name)));
  tokio::fs::write(&stored, &bytes).await?;

  let imported = state.registry.import_roster(stored.clone()).await;
  if let Err(e) = tokio::fs::remove_file(&stored).await {
    warn!(path = %stored.display(), error = %e, "could not remove uploaded roster");
  }
  let summary = imported?;

  Ok(Json(UploadResponse {
    success: true,
    message: format!("Successfully added {} participants", summary.added),
    added:   summary.added,
    skipped: summary.skipped,
  }))
}

/// Reduce a client-supplied file name to a safe, lowercase basename.
///
/// Directory components are dropped and anything outside `[a-z0-9._-]`
/// becomes `_`. Lowercasing keeps the extension recognisable to the workbook
/// reader, which matches extensions case-sensitively.
fn sanitize_file_name(name: &str) -> String {
  let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
  let cleaned: String = base
    .chars()
    .map(|c| match c.to_ascii_lowercase() {
      c @ ('a'..='z' | '0'..='9' | '.' | '-' | '_') => c,
      _ => '_',
    })
    .collect();
  cleaned.trim_start_matches('.').to_owned()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sanitize_strips_directories_and_odd_characters() {
    assert_eq!(sanitize_file_name("Guest List.XLSX"), "guest_list.xlsx");
    assert_eq!(sanitize_file_name("../../etc/passwd.xls"), "passwd.xls");
    assert_eq!(sanitize_file_name(r"C:\Users\me\roster.xlsx"), "roster.xlsx");
    assert_eq!(sanitize_file_name("..hidden.xlsx"), "hidden.xlsx");
    assert_eq!(sanitize_file_name("Übersicht.xlsx"), "_bersicht.xlsx");
  }
}
