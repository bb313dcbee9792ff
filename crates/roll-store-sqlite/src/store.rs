//! [`SqliteStore`]: the SQLite implementation of [`RegistryStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, TransactionBehavior};

use roll_core::{
  attendance::{Arrival, AttendanceRecord},
  participant::{NewParticipant, Participant, ParticipantId},
  store::{Counts, RegistryStore},
};

use crate::{
  encode::{
    PARTICIPANT_COLUMNS, RawAttendance, RawAttendanceRecord, RawParticipant, encode_dt,
    now,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roll registry backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mainly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn participants_where(
    &self,
    clause: &'static str,
  ) -> Result<Vec<Participant>> {
    let raws: Vec<RawParticipant> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {PARTICIPANT_COLUMNS} FROM participants {clause} ORDER BY participant_id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawParticipant::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawParticipant::into_participant).collect()
  }
}

fn select_participant(
  conn: &rusqlite::Connection,
  id: i64,
) -> rusqlite::Result<Option<RawParticipant>> {
  conn
    .query_row(
      &format!("SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE participant_id = ?1"),
      rusqlite::params![id],
      RawParticipant::from_row,
    )
    .optional()
}

// ─── RegistryStore impl ──────────────────────────────────────────────────────

impl RegistryStore for SqliteStore {
  type Error = Error;

  // ── Participants ──────────────────────────────────────────────────────────

  async fn find_by_email(&self, email: &str) -> Result<Option<Participant>> {
    let email = email.to_owned();

    let raw: Option<RawParticipant> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PARTICIPANT_COLUMNS} FROM participants WHERE email = ?1"),
            rusqlite::params![email],
            RawParticipant::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawParticipant::into_participant).transpose()
  }

  async fn insert_if_absent(&self, input: NewParticipant) -> Result<Option<Participant>> {
    let created_at = now();
    let name       = input.name.clone();
    let email      = input.email.clone();
    let at_str     = encode_dt(created_at);

    let inserted: Option<i64> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT INTO participants (name, email, notified, created_at)
           VALUES (?1, ?2, 0, ?3)
           ON CONFLICT (email) DO NOTHING",
          rusqlite::params![name, email, at_str],
        )?;
        Ok((changed == 1).then(|| conn.last_insert_rowid()))
      })
      .await?;

    Ok(inserted.map(|id| Participant {
      participant_id: ParticipantId(id),
      name:           input.name,
      email:          input.email,
      code_path:      None,
      notified:       false,
      created_at,
    }))
  }

  async fn get_participant(&self, id: ParticipantId) -> Result<Option<Participant>> {
    let raw = self
      .conn
      .call(move |conn| Ok(select_participant(conn, id.0)?))
      .await?;

    raw.map(RawParticipant::into_participant).transpose()
  }

  async fn list_participants(&self) -> Result<Vec<Participant>> {
    self.participants_where("").await
  }

  async fn set_code_path(&self, id: ParticipantId, path: String) -> Result<Participant> {
    let (changed, raw) = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE participants SET code_path = ?2
           WHERE participant_id = ?1 AND code_path IS NULL",
          rusqlite::params![id.0, path],
        )?;
        Ok((changed, select_participant(conn, id.0)?))
      })
      .await?;

    match raw {
      None => Err(Error::ParticipantNotFound(id)),
      Some(_) if changed == 0 => Err(Error::CodeAlreadyProvisioned(id)),
      Some(raw) => raw.into_participant(),
    }
  }

  async fn list_unnotified(&self) -> Result<Vec<Participant>> {
    self
      .participants_where("WHERE notified = 0 AND code_path IS NOT NULL")
      .await
  }

  async fn mark_notified(&self, id: ParticipantId) -> Result<()> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE participants SET notified = 1 WHERE participant_id = ?1",
          rusqlite::params![id.0],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::ParticipantNotFound(id));
    }
    Ok(())
  }

  // ── Ledger ────────────────────────────────────────────────────────────────

  async fn record_arrival(&self, id: ParticipantId) -> Result<Arrival> {
    let at_str = encode_dt(now());

    let outcome: Option<(bool, RawAttendance)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let exists = tx
          .query_row(
            "SELECT 1 FROM participants WHERE participant_id = ?1",
            rusqlite::params![id.0],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !exists {
          return Ok(None);
        }

        // The unique constraint decides the race; whichever row is there
        // afterwards is the participant's one arrival.
        let inserted = tx.execute(
          "INSERT INTO attendance (participant_id, entry_time) VALUES (?1, ?2)
           ON CONFLICT (participant_id) DO NOTHING",
          rusqlite::params![id.0, at_str],
        )?;

        let raw = tx.query_row(
          "SELECT attendance_id, participant_id, entry_time
           FROM attendance WHERE participant_id = ?1",
          rusqlite::params![id.0],
          |row| {
            Ok(RawAttendance {
              attendance_id:  row.get(0)?,
              participant_id: row.get(1)?,
              entry_time:     row.get(2)?,
            })
          },
        )?;

        tx.commit()?;
        Ok(Some((inserted == 1, raw)))
      })
      .await?;

    let (recorded, raw) = outcome.ok_or(Error::ParticipantNotFound(id))?;
    let event = raw.into_event()?;

    Ok(if recorded {
      Arrival::Recorded(event)
    } else {
      Arrival::AlreadyArrived(event)
    })
  }

  async fn list_attendance(&self) -> Result<Vec<AttendanceRecord>> {
    let raws: Vec<RawAttendanceRecord> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT p.participant_id, p.name, p.email, a.entry_time
           FROM attendance a
           JOIN participants p ON p.participant_id = a.participant_id
           ORDER BY a.entry_time DESC, a.attendance_id DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawAttendanceRecord {
              participant_id: row.get(0)?,
              name:           row.get(1)?,
              email:          row.get(2)?,
              entry_time:     row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAttendanceRecord::into_record).collect()
  }

  // ── Maintenance ───────────────────────────────────────────────────────────

  async fn counts(&self) -> Result<Counts> {
    let (participants, attendance): (i64, i64) = self
      .conn
      .call(|conn| {
        let participants =
          conn.query_row("SELECT COUNT(*) FROM participants", [], |r| r.get(0))?;
        let attendance =
          conn.query_row("SELECT COUNT(*) FROM attendance", [], |r| r.get(0))?;
        Ok((participants, attendance))
      })
      .await?;

    Ok(Counts {
      participants: participants.max(0) as u64,
      attendance:   attendance.max(0) as u64,
    })
  }

  async fn clear(&self) -> Result<Counts> {
    // Ids are never reused (AUTOINCREMENT, sqlite_sequence left alone), so a
    // code mailed before a reset cannot resolve to someone imported after it.
    let (participants, attendance) = self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        let attendance   = tx.execute("DELETE FROM attendance", [])?;
        let participants = tx.execute("DELETE FROM participants", [])?;
        tx.commit()?;
        Ok((participants, attendance))
      })
      .await?;

    Ok(Counts {
      participants: participants as u64,
      attendance:   attendance as u64,
    })
  }
}
