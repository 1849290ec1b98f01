//! Client configuration.

use std::time::Duration;

use serde::Deserialize;

/// Production base URL of the verification API.
pub const DEFAULT_BASE_URL: &str = "https://api.imeicheck.net";

/// `serviceId` selecting the plain IMEI check.
pub const IMEI_CHECK_SERVICE_ID: u32 = 12;

/// Which of the two API tokens to authenticate with.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CheckEnvironment {
  #[default]
  Sandbox,
  Production,
}

/// Everything [`ImeiCheckClient`](crate::ImeiCheckClient) needs, built once
/// at startup.
#[derive(Debug, Clone)]
pub struct CheckConfig {
  /// Scheme and host, without the `/v1/checks` path.
  pub base_url:         String,
  pub sandbox_token:    String,
  pub production_token: String,
  pub environment:      CheckEnvironment,
  /// Applies to the whole request, connect to last body byte.
  pub timeout:          Duration,
}

impl CheckConfig {
  pub fn new(sandbox_token: String, production_token: String) -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
      sandbox_token,
      production_token,
      environment: CheckEnvironment::default(),
      timeout: Duration::from_secs(30),
    }
  }

  /// The bearer token for the selected environment.
  pub fn token(&self) -> &str {
    match self.environment {
      CheckEnvironment::Sandbox => &self.sandbox_token,
      CheckEnvironment::Production => &self.production_token,
    }
  }
}
