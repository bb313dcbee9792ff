//! SQL schema for the Roll SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS participants (
    participant_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name           TEXT NOT NULL,
    email          TEXT NOT NULL UNIQUE,   -- lowercase; dedup key for uploads
    code_path      TEXT,                   -- set once after provisioning
    notified       INTEGER NOT NULL DEFAULT 0,
    created_at     TEXT NOT NULL           -- RFC 3339 UTC; server-assigned
);

-- One row per arrival, never updated.
-- UNIQUE (participant_id) makes a second arrival for the same participant
-- impossible even when two scans race.
CREATE TABLE IF NOT EXISTS attendance (
    attendance_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    participant_id INTEGER NOT NULL REFERENCES participants(participant_id),
    entry_time     TEXT NOT NULL,
    UNIQUE (participant_id)
);

CREATE INDEX IF NOT EXISTS attendance_entry_idx ON attendance(entry_time);

PRAGMA user_version = 1;
";
