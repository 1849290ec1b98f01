//! Bearer-token check for the JSON API.
//!
//! The API shares its secret with the bot: callers present the bot token as
//! `Authorization: Bearer <token>`.

use std::sync::Arc;

use axum::{
  extract::{Request, State},
  http::{HeaderMap, header},
  middleware::Next,
  response::Response,
};
use tracing::warn;

use crate::{ServerConfig, error::Error};

/// Verify the bearer token directly from headers.
pub fn verify_token(headers: &HeaderMap, expected: &str) -> Result<(), Error> {
  let token = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .ok_or(Error::Unauthorized)?;

  if expected.is_empty() || token.trim() != expected {
    return Err(Error::Unauthorized);
  }
  Ok(())
}

/// Middleware rejecting requests without the right token.
pub async fn require_token(
  State(config): State<Arc<ServerConfig>>,
  req: Request,
  next: Next,
) -> Result<Response, Error> {
  if let Err(e) = verify_token(req.headers(), &config.bot_token) {
    warn!(path = %req.uri().path(), "rejected API request without valid token");
    return Err(e);
  }
  Ok(next.run(req).await)
}
