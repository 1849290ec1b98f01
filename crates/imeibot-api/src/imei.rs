//! Handler for `POST /check-imei/`.
//!
//! | Status | When |
//! |--------|------|
//! | 200 | lookup payload, from cache or freshly fetched |
//! | 400 | not 15 digits, or bad check digit |
//! | 422 | body is not `{"imei": string}` |
//! | 502 | verification service unreachable or refused |

use axum::{Json, extract::State};
use imeibot_core::{
  checker::CheckService,
  lookup::Lookup,
  record::CheckPayload,
  store::LookupCache,
};
use serde::Deserialize;

use crate::{
  error::ApiError,
  extract::{BodySchema, FieldKind, ValidJson},
};

#[derive(Debug, Deserialize)]
pub struct CheckImeiBody {
  pub imei: String,
}

impl BodySchema for CheckImeiBody {
  const FIELDS: &'static [(&'static str, FieldKind)] = &[("imei", FieldKind::String)];
}

/// `POST /check-imei/`: body: `{"imei":"356735111052198"}`
pub async fn check<S, C>(
  State(lookup): State<Lookup<S, C>>,
  ValidJson(body): ValidJson<CheckImeiBody>,
) -> Result<Json<CheckPayload>, ApiError>
where
  S: LookupCache,
  C: CheckService,
{
  let record = lookup.lookup(&body.imei).await?;
  Ok(Json(record.payload))
}
