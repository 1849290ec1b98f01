//! [`ValidJson`]: a JSON body extractor that reports every bad field at once.
//!
//! axum's own `Json` stops at the first serde error and answers with plain
//! text. Request bodies here are small flat objects, so each one declares its
//! fields up front and the extractor checks all of them before deserializing.

use axum::{
  body::Bytes,
  extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{ApiError, FieldError};

/// JSON type a body field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  String,
  Integer,
  Boolean,
}

impl FieldKind {
  fn accepts(self, value: &Value) -> bool {
    match self {
      FieldKind::String => value.is_string(),
      FieldKind::Integer => value.is_i64(),
      FieldKind::Boolean => value.is_boolean(),
    }
  }

  fn mismatch(self) -> (&'static str, &'static str) {
    match self {
      FieldKind::String => ("Input should be a valid string", "string_type"),
      FieldKind::Integer => ("Input should be a valid integer", "int_type"),
      FieldKind::Boolean => ("Input should be a valid boolean", "bool_type"),
    }
  }
}

/// A request body with a fixed set of required fields.
pub trait BodySchema: DeserializeOwned {
  const FIELDS: &'static [(&'static str, FieldKind)];
}

/// Check `value` against `T::FIELDS`, collecting every violation.
pub fn validate<T: BodySchema>(value: &Value) -> Result<(), Vec<FieldError>> {
  let Some(obj) = value.as_object() else {
    return Err(vec![FieldError::new(
      &["body"],
      "Input should be a valid dictionary",
      "dict_type",
    )]);
  };

  let errors: Vec<FieldError> = T::FIELDS
    .iter()
    .filter_map(|&(name, kind)| check_field(obj, name, kind))
    .collect();

  if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn check_field(obj: &Map<String, Value>, name: &str, kind: FieldKind) -> Option<FieldError> {
  match obj.get(name) {
    None => Some(FieldError::new(&["body", name], "Field required", "missing")),
    Some(v) if kind.accepts(v) => None,
    Some(_) => {
      let (msg, ty) = kind.mismatch();
      Some(FieldError::new(&["body", name], msg, ty))
    }
  }
}

/// Extracts and validates a `T` from the request body.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
  S: Send + Sync,
  T: BodySchema,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let invalid_json =
      || ApiError::Validation(vec![FieldError::new(&["body"], "JSON decode error", "json_invalid")]);

    let bytes = Bytes::from_request(req, state)
      .await
      .map_err(|_| invalid_json())?;
    let value: Value = serde_json::from_slice(&bytes).map_err(|_| invalid_json())?;

    validate::<T>(&value).map_err(ApiError::Validation)?;

    serde_json::from_value(value)
      .map(ValidJson)
      .map_err(|e| {
        ApiError::Validation(vec![FieldError::new(&["body"], &e.to_string(), "value_error")])
      })
  }
}

#[cfg(test)]
mod tests {
  use serde::Deserialize;
  use serde_json::json;

  use super::*;

  #[derive(Debug, Deserialize)]
  #[allow(dead_code)]
  struct Toggle {
    tg_id:     i64,
    is_active: bool,
  }

  impl BodySchema for Toggle {
    const FIELDS: &'static [(&'static str, FieldKind)] =
      &[("tg_id", FieldKind::Integer), ("is_active", FieldKind::Boolean)];
  }

  #[test]
  fn valid_body_passes() {
    assert!(validate::<Toggle>(&json!({"tg_id": 5, "is_active": true})).is_ok());
  }

  #[test]
  fn every_bad_field_is_reported() {
    let errs = validate::<Toggle>(&json!({"tg_id": "five"})).unwrap_err();
    assert_eq!(errs, vec![
      FieldError::new(&["body", "tg_id"], "Input should be a valid integer", "int_type"),
      FieldError::new(&["body", "is_active"], "Field required", "missing"),
    ]);
  }

  #[test]
  fn non_object_body_is_rejected() {
    let errs = validate::<Toggle>(&json!([1, 2])).unwrap_err();
    assert_eq!(errs[0].kind, "dict_type");
    assert_eq!(errs[0].loc, ["body"]);
  }

  #[test]
  fn float_is_not_an_integer() {
    let errs = validate::<Toggle>(&json!({"tg_id": 1.5, "is_active": false})).unwrap_err();
    assert_eq!(errs.len(), 1);
    assert_eq!(errs[0].kind, "int_type");
  }
}
