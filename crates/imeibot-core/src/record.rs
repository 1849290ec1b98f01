//! Lookup results returned by the verification service.
//!
//! The service answers with a JSON object whose `properties` member describes
//! the device. Only a handful of property names are known; everything else is
//! carried through verbatim so nothing the service sent is lost.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Imei;

/// Device description from the verification service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceProperties {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub device_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub meid:        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub imei2:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub serial:      Option<String>,
  /// Any other property, preserved as returned.
  #[serde(flatten)]
  pub extra:       Map<String, Value>,
}

/// A successful response body from the verification service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckPayload {
  pub properties: DeviceProperties,
  /// Top-level members other than `properties` (status, service, ids...).
  #[serde(flatten)]
  pub extra:      Map<String, Value>,
}

/// A stored lookup. One per IMEI, never overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupRecord {
  pub imei:       Imei,
  pub payload:    CheckPayload,
  /// When the verification service was queried for this IMEI.
  pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn payload_keeps_unknown_members() {
    let body = json!({
      "id": "chk_1",
      "status": "successful",
      "properties": {
        "deviceName": "iPhone 12",
        "meid": "35673511105219",
        "imei2": "356735111052206",
        "serial": "F17DL0ABCD12",
        "simLock": false
      }
    });

    let payload: CheckPayload = serde_json::from_value(body.clone()).unwrap();
    assert_eq!(payload.properties.device_name.as_deref(), Some("iPhone 12"));
    assert_eq!(payload.properties.serial.as_deref(), Some("F17DL0ABCD12"));
    assert_eq!(payload.properties.extra["simLock"], json!(false));
    assert_eq!(payload.extra["status"], json!("successful"));

    assert_eq!(serde_json::to_value(&payload).unwrap(), body);
  }

  #[test]
  fn missing_properties_is_rejected() {
    let body = json!({ "status": "failed" });
    assert!(serde_json::from_value::<CheckPayload>(body).is_err());
  }
}
