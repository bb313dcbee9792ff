//! Error type for `roll-store-sqlite`.

use roll_core::participant::ParticipantId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] roll_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("participant not found: {0}")]
  ParticipantNotFound(ParticipantId),

  #[error("participant {0} already has a provisioned code")]
  CodeAlreadyProvisioned(ParticipantId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
