//! Integration tests for `SqliteStore` against an in-memory database.

use std::{collections::HashSet, sync::Arc};

use chrono::Utc;
use roll_core::{
  attendance::Arrival,
  participant::{NewParticipant, ParticipantId},
  store::{Counts, RegistryStore},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn ada() -> NewParticipant { NewParticipant::new("Ada Lovelace", "ada@example.com") }

fn alan() -> NewParticipant { NewParticipant::new("Alan Turing", "alan@example.com") }

// ─── Participants ────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_participant() {
  let s = store().await;

  let p = s.insert_if_absent(ada()).await.unwrap().unwrap();
  assert_eq!(p.name, "Ada Lovelace");
  assert_eq!(p.email, "ada@example.com");
  assert!(p.code_path.is_none());
  assert!(!p.notified);

  let fetched = s.get_participant(p.participant_id).await.unwrap().unwrap();
  assert_eq!(fetched, p);
}

#[tokio::test]
async fn insert_if_absent_skips_existing_email() {
  let s = store().await;

  let first = s.insert_if_absent(ada()).await.unwrap();
  assert!(first.is_some());

  let again = s
    .insert_if_absent(NewParticipant::new("Someone Else", "ADA@example.com"))
    .await
    .unwrap();
  assert!(again.is_none());

  let all = s.list_participants().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].name, "Ada Lovelace");
}

#[tokio::test]
async fn find_by_email_matches_normalised_address() {
  let s = store().await;
  s.insert_if_absent(ada()).await.unwrap();

  assert!(s.find_by_email("ada@example.com").await.unwrap().is_some());
  assert!(s.find_by_email("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn get_participant_missing_returns_none() {
  let s = store().await;
  assert!(s.get_participant(ParticipantId(99)).await.unwrap().is_none());
}

#[tokio::test]
async fn list_participants_in_id_order() {
  let s = store().await;
  let a = s.insert_if_absent(ada()).await.unwrap().unwrap();
  let b = s.insert_if_absent(alan()).await.unwrap().unwrap();

  let ids: Vec<_> = s
    .list_participants()
    .await
    .unwrap()
    .into_iter()
    .map(|p| p.participant_id)
    .collect();
  assert_eq!(ids, vec![a.participant_id, b.participant_id]);
  assert!(a.participant_id < b.participant_id);
}

// ─── Code path ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn set_code_path_once() {
  let s = store().await;
  let p = s.insert_if_absent(ada()).await.unwrap().unwrap();

  let updated = s
    .set_code_path(p.participant_id, "codes/qr_1_aaaa.png".into())
    .await
    .unwrap();
  assert_eq!(updated.code_path.as_deref(), Some("codes/qr_1_aaaa.png"));

  let err = s
    .set_code_path(p.participant_id, "codes/qr_1_bbbb.png".into())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::CodeAlreadyProvisioned(id) if id == p.participant_id));

  let fetched = s.get_participant(p.participant_id).await.unwrap().unwrap();
  assert_eq!(fetched.code_path.as_deref(), Some("codes/qr_1_aaaa.png"));
}

#[tokio::test]
async fn set_code_path_unknown_participant() {
  let s = store().await;
  let err = s
    .set_code_path(ParticipantId(5), "x.png".into())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::ParticipantNotFound(ParticipantId(5))));
}

// ─── Notification state ──────────────────────────────────────────────────────

#[tokio::test]
async fn unnotified_requires_a_provisioned_code() {
  let s = store().await;
  let a = s.insert_if_absent(ada()).await.unwrap().unwrap();
  let b = s.insert_if_absent(alan()).await.unwrap().unwrap();
  s.set_code_path(a.participant_id, "a.png".into()).await.unwrap();

  let pending = s.list_unnotified().await.unwrap();
  assert_eq!(pending.len(), 1);
  assert_eq!(pending[0].participant_id, a.participant_id);

  s.set_code_path(b.participant_id, "b.png".into()).await.unwrap();
  s.mark_notified(a.participant_id).await.unwrap();

  let pending = s.list_unnotified().await.unwrap();
  assert_eq!(pending.len(), 1);
  assert_eq!(pending[0].participant_id, b.participant_id);
  assert!(s.get_participant(a.participant_id).await.unwrap().unwrap().notified);
}

#[tokio::test]
async fn mark_notified_unknown_participant() {
  let s = store().await;
  let err = s.mark_notified(ParticipantId(3)).await.unwrap_err();
  assert!(matches!(err, Error::ParticipantNotFound(ParticipantId(3))));
}

// ─── Arrivals ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn first_arrival_is_recorded() {
  let s = store().await;
  let p = s.insert_if_absent(ada()).await.unwrap().unwrap();

  let before = Utc::now() - chrono::Duration::seconds(1);
  let arrival = s.record_arrival(p.participant_id).await.unwrap();
  let after = Utc::now();

  let Arrival::Recorded(event) = arrival else {
    panic!("expected a recorded arrival, got {arrival:?}");
  };
  assert_eq!(event.participant_id, p.participant_id);
  assert!(event.entry_time >= before && event.entry_time <= after);
}

#[tokio::test]
async fn second_arrival_returns_original_event() {
  let s = store().await;
  let p = s.insert_if_absent(ada()).await.unwrap().unwrap();

  let first = s.record_arrival(p.participant_id).await.unwrap();
  let second = s.record_arrival(p.participant_id).await.unwrap();

  assert!(matches!(first, Arrival::Recorded(_)));
  assert!(matches!(second, Arrival::AlreadyArrived(_)));
  assert_eq!(first.event(), second.event());
  assert_eq!(s.counts().await.unwrap().attendance, 1);
}

#[tokio::test]
async fn arrival_for_unknown_participant_writes_nothing() {
  let s = store().await;
  let err = s.record_arrival(ParticipantId(41)).await.unwrap_err();
  assert!(matches!(err, Error::ParticipantNotFound(ParticipantId(41))));
  assert_eq!(s.counts().await.unwrap().attendance, 0);
}

#[tokio::test]
async fn concurrent_arrivals_record_exactly_once() {
  let s = Arc::new(store().await);
  let p = s.insert_if_absent(ada()).await.unwrap().unwrap();

  let mut handles = Vec::new();
  for _ in 0..16 {
    let s = Arc::clone(&s);
    handles.push(tokio::spawn(async move {
      s.record_arrival(p.participant_id).await.unwrap()
    }));
  }

  let mut recorded = 0;
  let mut events = HashSet::new();
  for h in handles {
    let arrival = h.await.unwrap();
    if matches!(arrival, Arrival::Recorded(_)) {
      recorded += 1;
    }
    events.insert(arrival.event().attendance_id);
  }

  assert_eq!(recorded, 1);
  assert_eq!(events.len(), 1);
  assert_eq!(s.counts().await.unwrap().attendance, 1);
}

#[tokio::test]
async fn attendance_lists_newest_first() {
  let s = store().await;
  let a = s.insert_if_absent(ada()).await.unwrap().unwrap();
  let b = s.insert_if_absent(alan()).await.unwrap().unwrap();

  s.record_arrival(a.participant_id).await.unwrap();
  tokio::time::sleep(std::time::Duration::from_millis(5)).await;
  s.record_arrival(b.participant_id).await.unwrap();

  let records = s.list_attendance().await.unwrap();
  assert_eq!(records.len(), 2);
  assert_eq!(records[0].email, "alan@example.com");
  assert_eq!(records[1].email, "ada@example.com");
  assert!(records[0].entry_time >= records[1].entry_time);
}

// ─── Maintenance ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn clear_empties_both_tables() {
  let s = store().await;
  let a = s.insert_if_absent(ada()).await.unwrap().unwrap();
  s.insert_if_absent(alan()).await.unwrap();
  s.record_arrival(a.participant_id).await.unwrap();

  let removed = s.clear().await.unwrap();
  assert_eq!(removed, Counts { participants: 2, attendance: 1 });
  assert_eq!(s.counts().await.unwrap(), Counts::default());
}

#[tokio::test]
async fn ids_are_not_reused_after_clear() {
  let s = store().await;
  let before = s.insert_if_absent(ada()).await.unwrap().unwrap();
  s.clear().await.unwrap();
  let after = s.insert_if_absent(ada()).await.unwrap().unwrap();
  assert!(after.participant_id > before.participant_id);
}

#[tokio::test]
async fn open_on_disk_persists_between_connections() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("registry.db");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.insert_if_absent(ada()).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  assert!(s.find_by_email("ada@example.com").await.unwrap().is_some());
}
