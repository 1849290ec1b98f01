//! Error type for `imeibot-store-sqlite`.

use imeibot_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] imeibot_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// An insert hit the UNIQUE constraint on `imei.imei`.
  #[error("a lookup record already exists for {0}")]
  DuplicateKey(String),
}

impl StoreError for Error {
  fn is_duplicate_key(&self) -> bool { matches!(self, Self::DuplicateKey(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
