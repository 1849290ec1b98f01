//! Error type for `imeibot-telegram`.

use imeibot_core::lookup::LookupError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to deliver message: {0}")]
  Messenger(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error(transparent)]
  Lookup(#[from] LookupError),

  #[error("malformed callback data: {0:?}")]
  BadCallback(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
