//! Error type for `imeibot-checker`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid client configuration: {0}")]
  Config(String),

  /// Connection failure, timeout, or a broken response stream.
  #[error("request to verification service failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("verification service answered {status}: {body}")]
  Status {
    status: reqwest::StatusCode,
    body:   String,
  },

  #[error("unexpected response body: {0}")]
  Decode(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
