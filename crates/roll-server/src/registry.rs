//! The registry service: every multi-step operation the HTTP layer exposes.
//!
//! Each operation runs to completion inside one request. Store calls are
//! committed one at a time; nothing here wraps several of them in a batch
//! transaction, so a failure part-way leaves the earlier steps in place.

use std::{path::PathBuf, sync::Arc};

use roll_core::{
  attendance::{Arrival, AttendanceEvent, AttendanceRecord},
  notify::{Invitation, Mailer},
  participant::Participant,
  provision::CodeProvisioner,
  store::{Counts, RegistryStore},
  token,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{Error, Result};

// ─── Reports ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
  pub added:   usize,
  /// Rows whose email was already registered.
  pub skipped: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NotifyReport {
  pub sent:   usize,
  pub failed: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResetReport {
  pub participants:      u64,
  pub attendance:        u64,
  pub artifacts_removed: usize,
  /// Code images still on disk because they could not be removed.
  pub artifacts_left:    usize,
}

/// What a scan did to the participant's arrival state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
  /// First scan; `event` was just written.
  Marked {
    participant: Participant,
    event:       AttendanceEvent,
  },
  /// Already arrived; `event` is the original arrival, unchanged.
  AlreadyArrived {
    participant: Participant,
    event:       AttendanceEvent,
  },
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// Orchestrates the store, the code provisioner, and the mailer.
pub struct Registry<S> {
  store:       Arc<S>,
  provisioner: Arc<dyn CodeProvisioner>,
  mailer:      Option<Arc<dyn Mailer>>,
}

impl<S> Registry<S>
where
  S: RegistryStore + 'static,
{
  pub fn new(
    store: Arc<S>,
    provisioner: Arc<dyn CodeProvisioner>,
    mailer: Option<Arc<dyn Mailer>>,
  ) -> Self {
    Self { store, provisioner, mailer }
  }

  // ── Roster import and provisioning ────────────────────────────────────────

  /// Read the roster at `path` and provision every new participant in file
  /// order.
  ///
  /// Rows whose email is already registered are skipped silently. Each new
  /// participant is inserted, rendered, and linked to its code before the next
  /// row is touched; an error aborts the rest of the file only.
  pub async fn import_roster(&self, path: PathBuf) -> Result<ImportSummary> {
    let roster = tokio::task::spawn_blocking(move || roll_sheet::read_roster(&path)).await??;
    let mut summary = ImportSummary::default();

    for entry in roster {
      let existing = self
        .store
        .find_by_email(&entry.email)
        .await
        .map_err(|e| Error::Store(Box::new(e)))?;
      if existing.is_some() {
        summary.skipped += 1;
        continue;
      }

      let Some(participant) = self
        .store
        .insert_if_absent(entry)
        .await
        .map_err(|e| Error::Store(Box::new(e)))?
      else {
        summary.skipped += 1;
        continue;
      };

      let id = participant.participant_id;
      let provisioner = Arc::clone(&self.provisioner);
      let code_path = tokio::task::spawn_blocking(move || provisioner.provision(id)).await??;

      self
        .store
        .set_code_path(id, code_path)
        .await
        .map_err(|e| Error::Store(Box::new(e)))?;
      summary.added += 1;
    }

    info!(added = summary.added, skipped = summary.skipped, "roster imported");
    Ok(summary)
  }

  pub async fn participants(&self) -> Result<Vec<Participant>> {
    self
      .store
      .list_participants()
      .await
      .map_err(|e| Error::Store(Box::new(e)))
  }

  // ── Notification ──────────────────────────────────────────────────────────

  /// Mail every provisioned, not-yet-notified participant their code.
  ///
  /// A failed recipient is logged and counted; the batch carries on and only
  /// successful sends are marked as notified.
  pub async fn notify_unsent(&self, message: &str) -> Result<NotifyReport> {
    let mailer = self.mailer.clone().ok_or(Error::MailNotConfigured)?;
    let pending = self
      .store
      .list_unnotified()
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;

    let mut report = NotifyReport::default();

    for participant in pending {
      let Some(code_path) = participant.code_path.as_deref() else {
        continue;
      };

      let attachment = match tokio::fs::read(code_path).await {
        Ok(bytes) => bytes,
        Err(e) => {
          warn!(email = %participant.email, path = code_path, error = %e, "code image unreadable");
          report.failed += 1;
          continue;
        }
      };

      let invitation = Invitation::compose(&participant, message, attachment);
      let mailer = Arc::clone(&mailer);
      let sent = tokio::task::spawn_blocking(move || mailer.send(&invitation)).await;

      match sent {
        Ok(Ok(())) => {
          self
            .store
            .mark_notified(participant.participant_id)
            .await
            .map_err(|e| Error::Store(Box::new(e)))?;
          report.sent += 1;
        }
        Ok(Err(e)) => {
          warn!(email = %participant.email, error = %e, "invitation not sent");
          report.failed += 1;
        }
        Err(e) => {
          warn!(email = %participant.email, error = %e, "mail task failed");
          report.failed += 1;
        }
      }
    }

    info!(sent = report.sent, failed = report.failed, "invitations processed");
    Ok(report)
  }

  // ── Scanning ──────────────────────────────────────────────────────────────

  /// Validate a scanned token and record the arrival if it is the first one.
  pub async fn scan(&self, raw: &str) -> Result<ScanOutcome> {
    let id = token::decode(raw)?;

    let participant = self
      .store
      .get_participant(id)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?
      .ok_or_else(|| Error::NotFound("Invalid QR code".into()))?;

    let arrival = self
      .store
      .record_arrival(id)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;

    Ok(match arrival {
      Arrival::Recorded(event) => {
        info!(participant = %id, "attendance marked");
        ScanOutcome::Marked { participant, event }
      }
      Arrival::AlreadyArrived(event) => {
        info!(participant = %id, "repeat scan");
        ScanOutcome::AlreadyArrived { participant, event }
      }
    })
  }

  // ── Reporting ─────────────────────────────────────────────────────────────

  /// Attendance records, newest first.
  pub async fn attendance(&self) -> Result<Vec<AttendanceRecord>> {
    self
      .store
      .list_attendance()
      .await
      .map_err(|e| Error::Store(Box::new(e)))
  }

  /// Write the attendance report into `dir`, in the same order as
  /// [`Self::attendance`]. The caller owns the returned file.
  pub async fn export_report(&self, dir: PathBuf) -> Result<PathBuf> {
    let records = self.attendance().await?;
    if records.is_empty() {
      return Err(Error::NotFound("No attendance records found".into()));
    }

    tokio::fs::create_dir_all(&dir).await?;
    let path =
      tokio::task::spawn_blocking(move || roll_sheet::write_report(&records, &dir)).await??;
    Ok(path)
  }

  pub async fn stats(&self) -> Result<Counts> {
    self.store.counts().await.map_err(|e| Error::Store(Box::new(e)))
  }

  // ── Reset ─────────────────────────────────────────────────────────────────

  /// Wipe the ledger and participants, then sweep the code images.
  ///
  /// The database part is one transaction; the sweep runs afterwards and is
  /// best effort. Images it cannot remove are counted in the report rather
  /// than restored into the database.
  pub async fn reset(&self) -> Result<ResetReport> {
    let removed = self
      .store
      .clear()
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;

    let provisioner = Arc::clone(&self.provisioner);
    let purge = tokio::task::spawn_blocking(move || provisioner.purge()).await??;

    let report = ResetReport {
      participants:      removed.participants,
      attendance:        removed.attendance,
      artifacts_removed: purge.removed,
      artifacts_left:    purge.failed.len(),
    };
    info!(?report, "system reset");
    Ok(report)
  }
}
