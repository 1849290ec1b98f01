//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Missing or wrong bearer token on `/api`.
  #[error("unauthorized")]
  Unauthorized,
  /// Webhook call from outside Telegram's address ranges.
  #[error("request not from Telegram")]
  NotFromTelegram,
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let detail = match self {
      Error::Unauthorized => "Не авторизованный запрос",
      Error::NotFromTelegram => "Unauthorized: Request not from Telegram",
    };
    (StatusCode::FORBIDDEN, Json(json!({ "detail": detail }))).into_response()
  }
}
