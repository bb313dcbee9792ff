//! `POST /scan-qr`: validate a scanned token and mark attendance.
//!
//! | Outcome | Status | Body |
//! |---------|--------|------|
//! | first scan | 200 | `{success:true, message, participant}` |
//! | repeat scan | 409 | `{success:false, message}` with the original time |
//! | malformed token | 400 | `Invalid QR code format` |
//! | unknown participant | 404 | `Invalid QR code` |

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use roll_core::{attendance::format_entry_time, store::RegistryStore};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  error::{Error, Result},
  handlers::Outcome,
  registry::ScanOutcome,
};

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
  #[serde(default)]
  pub qr_data: String,
}

#[derive(Debug, Serialize)]
pub struct ScannedParticipant {
  pub name:       String,
  pub email:      String,
  pub entry_time: String,
}

#[derive(Debug, Serialize)]
pub struct ScanResponse {
  pub success:     bool,
  pub message:     String,
  pub participant: ScannedParticipant,
}

pub async fn handler<S>(
  State(state): State<AppState<S>>,
  payload: std::result::Result<Json<ScanRequest>, JsonRejection>,
) -> Result<Response>
where
  S: RegistryStore + 'static,
{
  let Json(request) = payload.map_err(|e| Error::Validation(e.body_text()))?;

  let response = match state.registry.scan(&request.qr_data).await? {
    ScanOutcome::Marked { participant, event } => Json(ScanResponse {
      success:     true,
      message:     format!("Attendance marked for {}", participant.name),
      participant: ScannedParticipant {
        name:       participant.name,
        email:      participant.email,
        entry_time: format_entry_time(event.entry_time),
      },
    })
    .into_response(),
    ScanOutcome::AlreadyArrived { participant, event } => (
      StatusCode::CONFLICT,
      Json(Outcome::failed(format!(
        "{} already marked attendance at {}",
        participant.name,
        format_entry_time(event.entry_time)
      ))),
    )
      .into_response(),
  };
  Ok(response)
}
