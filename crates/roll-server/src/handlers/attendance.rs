//! Attendance listing and the xlsx download.

use axum::{
  Json,
  extract::State,
  http::header,
  response::IntoResponse,
};
use roll_core::{attendance::format_entry_time, store::RegistryStore};
use serde::Serialize;
use tracing::warn;

use crate::{AppState, error::Result};

pub const XLSX_CONTENT_TYPE: &str =
  "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Name the browser saves the download under.
pub const DOWNLOAD_NAME: &str = "attendance_report.xlsx";

#[derive(Debug, Serialize)]
pub struct AttendanceRow {
  pub name:       String,
  pub email:      String,
  pub entry_time: String,
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /attendance`, newest arrival first.
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<Vec<AttendanceRow>>>
where
  S: RegistryStore + 'static,
{
  let rows = state
    .registry
    .attendance()
    .await?
    .into_iter()
    .map(|r| AttendanceRow {
      name:       r.name,
      email:      r.email,
      entry_time: format_entry_time(r.entry_time),
    })
    .collect();
  Ok(Json(rows))
}

// ─── Download ─────────────────────────────────────────────────────────────────

/// `GET /download-attendance`
///
/// The report is generated into the upload directory, read back, and deleted
/// before the response is sent.
pub async fn download<S>(State(state): State<AppState<S>>) -> Result<impl IntoResponse>
where
  S: RegistryStore + 'static,
{
  let path = state
    .registry
    .export_report(state.config.upload_dir.clone())
    .await?;

  let bytes = tokio::fs::read(&path).await;
  if let Err(e) = tokio::fs::remove_file(&path).await {
    warn!(path = %path.display(), error = %e, "could not remove generated report");
  }
  let bytes = bytes?;

  Ok((
    [
      (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_owned()),
      (
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{DOWNLOAD_NAME}\""),
      ),
    ],
    bytes,
  ))
}
