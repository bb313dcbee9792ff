//! Attendance ledger types.
//!
//! A participant moves from not-arrived to arrived exactly once. The ledger
//! holds at most one [`AttendanceEvent`] per participant and never mutates it;
//! a repeated scan reads the original event back instead of writing a new one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::participant::ParticipantId;

/// Format used wherever an entry time is shown to people or exported.
pub const ENTRY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single recorded arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEvent {
  pub attendance_id:  i64,
  pub participant_id: ParticipantId,
  /// Server clock at the moment the arrival was recorded.
  pub entry_time:     DateTime<Utc>,
}

/// An attendance event joined with the participant it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
  pub participant_id: ParticipantId,
  pub name:           String,
  pub email:          String,
  pub entry_time:     DateTime<Utc>,
}

/// Result of the atomic conditional insert into the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arrival {
  /// First scan: a new event was written.
  Recorded(AttendanceEvent),
  /// The participant had already arrived; carries the original event.
  AlreadyArrived(AttendanceEvent),
}

impl Arrival {
  pub fn event(&self) -> &AttendanceEvent {
    match self {
      Self::Recorded(e) | Self::AlreadyArrived(e) => e,
    }
  }
}

/// Render an entry time as `YYYY-MM-DD HH:MM:SS`.
pub fn format_entry_time(at: DateTime<Utc>) -> String {
  at.format(ENTRY_TIME_FORMAT).to_string()
}
