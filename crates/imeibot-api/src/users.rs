//! Handler for `POST /vite-list/`, the bot's activation list.

use axum::{Json, extract::State};
use imeibot_core::{
  checker::CheckService,
  lookup::Lookup,
  store::{LookupCache, UserStore},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
  error::ApiError,
  extract::{BodySchema, FieldKind, ValidJson},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Activation {
  pub tg_id:     i64,
  pub is_active: bool,
}

impl BodySchema for Activation {
  const FIELDS: &'static [(&'static str, FieldKind)] =
    &[("tg_id", FieldKind::Integer), ("is_active", FieldKind::Boolean)];
}

/// `POST /vite-list/`: body: `{"tg_id":42,"is_active":true}`
///
/// Unknown users are created with the requested flag. Answers with the flag
/// as stored.
pub async fn set_activation<S, C>(
  State(lookup): State<Lookup<S, C>>,
  ValidJson(body): ValidJson<Activation>,
) -> Result<Json<Activation>, ApiError>
where
  S: LookupCache + UserStore,
  C: CheckService,
{
  let user = lookup
    .cache()
    .set_active(body.tg_id, body.is_active)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  info!(tg_id = user.tg_id, is_active = user.is_active, "activation set via API");

  Ok(Json(Activation {
    tg_id:     user.tg_id,
    is_active: user.is_active,
  }))
}
