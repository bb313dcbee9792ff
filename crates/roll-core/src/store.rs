//! The `RegistryStore` trait.
//!
//! Implemented by storage backends (e.g. `roll-store-sqlite`). The server
//! depends on this abstraction and receives a concrete store at construction,
//! so tests can hand it an in-memory backend.

use std::future::Future;

use serde::Serialize;

use crate::{
  attendance::{Arrival, AttendanceRecord},
  participant::{NewParticipant, Participant, ParticipantId},
};

/// Row counts for the two tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
  pub participants: u64,
  pub attendance:   u64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the participant table and the attendance ledger.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RegistryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Participants ──────────────────────────────────────────────────────

  /// Look up a participant by normalised email.
  fn find_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Participant>, Self::Error>> + Send + 'a;

  /// Dedup-insert: create the participant unless the email is already taken.
  ///
  /// Returns `None` when another participant owns the email. The check and the
  /// insert are a single statement.
  fn insert_if_absent(
    &self,
    input: NewParticipant,
  ) -> impl Future<Output = Result<Option<Participant>, Self::Error>> + Send + '_;

  fn get_participant(
    &self,
    id: ParticipantId,
  ) -> impl Future<Output = Result<Option<Participant>, Self::Error>> + Send + '_;

  /// All participants in ascending id order.
  fn list_participants(
    &self,
  ) -> impl Future<Output = Result<Vec<Participant>, Self::Error>> + Send + '_;

  /// Attach the code artifact path. Fails if a path is already set.
  fn set_code_path(
    &self,
    id: ParticipantId,
    path: String,
  ) -> impl Future<Output = Result<Participant, Self::Error>> + Send + '_;

  /// Provisioned participants that have not been notified yet, ascending id.
  fn list_unnotified(
    &self,
  ) -> impl Future<Output = Result<Vec<Participant>, Self::Error>> + Send + '_;

  fn mark_notified(
    &self,
    id: ParticipantId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Ledger ────────────────────────────────────────────────────────────

  /// Record an arrival unless one already exists for the participant.
  ///
  /// Implementations must make this a single atomic conditional insert so two
  /// concurrent scans of the same token cannot both record an event.
  fn record_arrival(
    &self,
    id: ParticipantId,
  ) -> impl Future<Output = Result<Arrival, Self::Error>> + Send + '_;

  /// All attendance events joined with their participants, newest first.
  fn list_attendance(
    &self,
  ) -> impl Future<Output = Result<Vec<AttendanceRecord>, Self::Error>> + Send + '_;

  // ── Maintenance ───────────────────────────────────────────────────────

  fn counts(&self) -> impl Future<Output = Result<Counts, Self::Error>> + Send + '_;

  /// Delete every attendance event and then every participant, in one
  /// transaction. Returns what was removed.
  fn clear(&self) -> impl Future<Output = Result<Counts, Self::Error>> + Send + '_;
}
