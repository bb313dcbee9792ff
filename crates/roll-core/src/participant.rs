//! Participant: one person on the roster, and the state of their code.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned participant identity. Rendered in decimal inside tokens.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ParticipantId(pub i64);

impl fmt::Display for ParticipantId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// A participant as persisted by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
  pub participant_id: ParticipantId,
  pub name:           String,
  /// Unique across all participants; always lowercase.
  pub email:          String,
  /// Path of the rendered code image. Set once, never changed afterwards.
  pub code_path:      Option<String>,
  pub notified:       bool,
  pub created_at:     DateTime<Utc>,
}

impl Participant {
  pub fn is_provisioned(&self) -> bool { self.code_path.is_some() }
}

/// A roster entry ready for dedup-insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParticipant {
  pub name:  String,
  pub email: String,
}

impl NewParticipant {
  /// Trim both fields and normalise the email.
  pub fn new(name: impl AsRef<str>, email: impl AsRef<str>) -> Self {
    Self {
      name:  name.as_ref().trim().to_owned(),
      email: normalize_email(email.as_ref()),
    }
  }

  /// Both fields carry something after trimming.
  pub fn is_complete(&self) -> bool { !self.name.is_empty() && !self.email.is_empty() }
}

/// Case-normalise an email address for uniqueness checks.
pub fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }
