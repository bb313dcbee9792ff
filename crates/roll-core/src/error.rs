//! Error types for `roll-core`.

use thiserror::Error;

use crate::participant::ParticipantId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid token: {0}")]
  InvalidToken(String),

  #[error("participant not found: {0}")]
  ParticipantNotFound(ParticipantId),

  #[error("code provisioning failed: {0}")]
  Provision(String),

  #[error("mail transport failed: {0}")]
  Transport(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
