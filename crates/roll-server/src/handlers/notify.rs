//! `POST /send-emails`: mail codes to everyone not yet notified.

use axum::{Json, body::Bytes, extract::State};
use roll_core::{notify::DEFAULT_MESSAGE, store::RegistryStore};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  error::{Error, Result},
};

#[derive(Debug, Default, Deserialize)]
pub struct NotifyRequest {
  #[serde(default)]
  pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NotifyResponse {
  pub success: bool,
  pub message: String,
  pub sent:    usize,
  pub failed:  usize,
}

/// Body `{"message": "…"}` is optional; an absent or blank message falls back
/// to the stock text.
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  body: Bytes,
) -> Result<Json<NotifyResponse>>
where
  S: RegistryStore + 'static,
{
  let request: NotifyRequest = if body.iter().all(u8::is_ascii_whitespace) {
    NotifyRequest::default()
  } else {
    serde_json::from_slice(&body)
      .map_err(|e| Error::Validation(format!("invalid request body: {e}")))?
  };

  let message = request
    .message
    .filter(|m| !m.trim().is_empty())
    .unwrap_or_else(|| DEFAULT_MESSAGE.to_owned());

  let report = state.registry.notify_unsent(&message).await?;
  Ok(Json(NotifyResponse {
    success: true,
    message: format!("QR codes sent to {} participants", report.sent),
    sent:    report.sent,
    failed:  report.failed,
  }))
}
