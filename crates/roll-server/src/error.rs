//! Error types and axum `IntoResponse` implementation.
//!
//! Every failure reaches the client as `{"success": false, "message": …}`
//! with a status code for its category.

use axum::{
  Json,
  extract::multipart::MultipartError,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Bad upload or request input.
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  InvalidToken(String),

  #[error("{0}")]
  NotFound(String),

  /// The request body went over the configured upload cap.
  #[error("{0}")]
  PayloadTooLarge(String),

  #[error("Email credentials not configured")]
  MailNotConfigured,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("{0}")]
  Sheet(#[source] roll_sheet::Error),

  #[error("{0}")]
  Provision(#[source] roll_core::Error),

  #[error("internal error: {0}")]
  Internal(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<roll_sheet::Error> for Error {
  fn from(e: roll_sheet::Error) -> Self {
    match e {
      roll_sheet::Error::Validation(m) => Error::Validation(m),
      // An unreadable workbook is the uploader's problem.
      parse @ roll_sheet::Error::Parse(_) => Error::Validation(parse.to_string()),
      other => Error::Sheet(other),
    }
  }
}

impl From<roll_core::Error> for Error {
  fn from(e: roll_core::Error) -> Self {
    match e {
      roll_core::Error::InvalidToken(m) => Error::InvalidToken(m),
      roll_core::Error::ParticipantNotFound(_) => Error::NotFound("Invalid QR code".into()),
      other => Error::Provision(other),
    }
  }
}

impl From<MultipartError> for Error {
  fn from(e: MultipartError) -> Self {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
      Error::PayloadTooLarge(e.body_text())
    } else {
      Error::Validation(e.body_text())
    }
  }
}

impl From<tokio::task::JoinError> for Error {
  fn from(e: tokio::task::JoinError) -> Self { Error::Internal(e.to_string()) }
}

impl From<std::io::Error> for Error {
  fn from(e: std::io::Error) -> Self { Error::Internal(e.to_string()) }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match &self {
      Error::Validation(_) | Error::InvalidToken(_) => StatusCode::BAD_REQUEST,
      Error::NotFound(_) => StatusCode::NOT_FOUND,
      Error::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
      Error::MailNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
      Error::Store(_) | Error::Sheet(_) | Error::Provision(_) | Error::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };

    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }

    (status, Json(json!({ "success": false, "message": self.to_string() }))).into_response()
  }
}
