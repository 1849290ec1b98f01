//! Error types for `imeibot-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Wrong length, non-digit characters, or a check digit mismatch.
  #[error("not a valid IMEI: {0:?}")]
  InvalidImei(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
