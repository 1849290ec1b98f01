//! SQL schema for the IMEI bot SQLite store.
//!
//! Executed once at connection startup. The version is recorded in
//! `PRAGMA user_version`; future migrations will be gated on it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per IMEI, written once after the first successful remote check.
-- No UPDATE is ever issued against this table.
CREATE TABLE IF NOT EXISTS imei (
    id          INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    imei        VARCHAR(15) NOT NULL UNIQUE,
    json_data   TEXT NOT NULL,   -- verification service payload
    created_at  TEXT NOT NULL    -- ISO 8601 UTC
);

CREATE TABLE IF NOT EXISTS user (
    id          INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    tg_id       INTEGER NOT NULL UNIQUE,
    is_active   INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL    -- ISO 8601 UTC
);

PRAGMA user_version = 1;
";
