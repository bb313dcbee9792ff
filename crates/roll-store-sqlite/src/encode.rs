//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`)
//! so that ordering by the text column is chronological.

use chrono::{DateTime, SecondsFormat, Utc};
use roll_core::{
  attendance::{AttendanceEvent, AttendanceRecord},
  participant::{Participant, ParticipantId},
};

use crate::{Error, Result};

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// Current server time, truncated to what the column can hold.
pub fn now() -> DateTime<Utc> {
  let now = Utc::now();
  // Round-trip through the stored form so callers see exactly what a later
  // read would return.
  decode_dt(&encode_dt(now)).unwrap_or(now)
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const PARTICIPANT_COLUMNS: &str =
  "participant_id, name, email, code_path, notified, created_at";

/// Raw values read directly from a `participants` row.
pub struct RawParticipant {
  pub participant_id: i64,
  pub name:           String,
  pub email:          String,
  pub code_path:      Option<String>,
  pub notified:       bool,
  pub created_at:     String,
}

impl RawParticipant {
  /// Read a row selected with [`PARTICIPANT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      participant_id: row.get(0)?,
      name:           row.get(1)?,
      email:          row.get(2)?,
      code_path:      row.get(3)?,
      notified:       row.get(4)?,
      created_at:     row.get(5)?,
    })
  }

  pub fn into_participant(self) -> Result<Participant> {
    Ok(Participant {
      participant_id: ParticipantId(self.participant_id),
      name:           self.name,
      email:          self.email,
      code_path:      self.code_path,
      notified:       self.notified,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from an `attendance` row.
pub struct RawAttendance {
  pub attendance_id:  i64,
  pub participant_id: i64,
  pub entry_time:     String,
}

impl RawAttendance {
  pub fn into_event(self) -> Result<AttendanceEvent> {
    Ok(AttendanceEvent {
      attendance_id:  self.attendance_id,
      participant_id: ParticipantId(self.participant_id),
      entry_time:     decode_dt(&self.entry_time)?,
    })
  }
}

/// Raw values from the `attendance ⋈ participants` join.
pub struct RawAttendanceRecord {
  pub participant_id: i64,
  pub name:           String,
  pub email:          String,
  pub entry_time:     String,
}

impl RawAttendanceRecord {
  pub fn into_record(self) -> Result<AttendanceRecord> {
    Ok(AttendanceRecord {
      participant_id: ParticipantId(self.participant_id),
      name:           self.name,
      email:          self.email,
      entry_time:     decode_dt(&self.entry_time)?,
    })
  }
}
