//! axum handlers, one module per concern.
//!
//! | Method | Path | Module |
//! |--------|------|--------|
//! | `GET`  | `/` | [`status`] |
//! | `GET`  | `/config-check` | [`status`] |
//! | `POST` | `/upload` | [`upload`] |
//! | `GET`  | `/participants` | [`participants`] |
//! | `POST` | `/send-emails` | [`notify`] |
//! | `POST` | `/scan-qr` | [`scan`] |
//! | `GET`  | `/attendance` | [`attendance`] |
//! | `GET`  | `/download-attendance` | [`attendance`] |
//! | `POST` | `/reset-system` | [`reset`] |

pub mod attendance;
pub mod notify;
pub mod participants;
pub mod reset;
pub mod scan;
pub mod status;
pub mod upload;

use serde::Serialize;

/// `{"success": …, "message": …}`, the envelope every mutating endpoint uses.
#[derive(Debug, Serialize)]
pub struct Outcome {
  pub success: bool,
  pub message: String,
}

impl Outcome {
  pub fn ok(message: impl Into<String>) -> Self {
    Self { success: true, message: message.into() }
  }

  pub fn failed(message: impl Into<String>) -> Self {
    Self { success: false, message: message.into() }
  }
}
