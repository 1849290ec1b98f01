//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error body has a single `detail` member: a message for most
//! failures, a list of [`FieldError`]s for a body that fails validation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use imeibot_core::lookup::LookupError;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const INVALID_IMEI_DETAIL: &str = "Некорректный IMEI";

/// One offending field of a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  /// Path to the field, starting with `"body"`.
  pub loc:  Vec<String>,
  pub msg:  String,
  #[serde(rename = "type")]
  pub kind: String,
}

impl FieldError {
  pub fn new(loc: &[&str], msg: &str, kind: &str) -> Self {
    Self {
      loc:  loc.iter().map(|s| s.to_string()).collect(),
      msg:  msg.to_owned(),
      kind: kind.to_owned(),
    }
  }
}

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("request body failed validation ({} field errors)", .0.len())]
  Validation(Vec<FieldError>),

  #[error("invalid IMEI: {0:?}")]
  InvalidImei(String),

  #[error("lookup failed: {0}")]
  LookupFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<LookupError> for ApiError {
  fn from(e: LookupError) -> Self {
    match e {
      LookupError::InvalidIdentifier(raw) => ApiError::InvalidImei(raw),
      LookupError::LookupFailed(e) => ApiError::LookupFailed(e),
      LookupError::Store(e) => ApiError::Store(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, detail) = match self {
      ApiError::Validation(fields) => (StatusCode::UNPROCESSABLE_ENTITY, json!(fields)),
      ApiError::InvalidImei(_) => (StatusCode::BAD_REQUEST, json!(INVALID_IMEI_DETAIL)),
      ApiError::LookupFailed(e) => {
        error!(error = %e, "verification service unavailable");
        (StatusCode::BAD_GATEWAY, json!(format!("IMEI check failed: {e}")))
      }
      ApiError::Store(e) => {
        error!(error = %e, "store error while serving API request");
        (StatusCode::INTERNAL_SERVER_ERROR, json!("Internal server error"))
      }
    };
    (status, Json(json!({ "detail": detail }))).into_response()
  }
}
