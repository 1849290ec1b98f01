//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (so they sort
//! lexically) and payloads as compact JSON.

use chrono::{DateTime, SecondsFormat, Utc};
use imeibot_core::{
  Imei,
  record::{CheckPayload, LookupRecord},
  user::User,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Payload ─────────────────────────────────────────────────────────────────

pub fn encode_payload(p: &CheckPayload) -> Result<String> {
  Ok(serde_json::to_string(p)?)
}

pub fn decode_payload(s: &str) -> Result<CheckPayload> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `imei` row.
pub struct RawRecord {
  pub imei:       String,
  pub json_data:  String,
  pub created_at: String,
}

impl RawRecord {
  pub fn into_record(self) -> Result<LookupRecord> {
    Ok(LookupRecord {
      imei:       Imei::parse(&self.imei)?,
      payload:    decode_payload(&self.json_data)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `user` row.
pub struct RawUser {
  pub tg_id:      i64,
  pub is_active:  bool,
  pub created_at: String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      tg_id:      self.tg_id,
      is_active:  self.is_active,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
