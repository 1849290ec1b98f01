//! [`ImeiCheckClient`]: `POST /v1/checks` over reqwest.

use imeibot_core::{Imei, checker::CheckService, record::CheckPayload};
use reqwest::{
  Client,
  header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue},
};
use serde::Serialize;
use tracing::debug;

use crate::{CheckConfig, Error, IMEI_CHECK_SERVICE_ID, Result};

/// Request body for `POST /v1/checks`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckRequest<'a> {
  device_id:  &'a str,
  service_id: u32,
}

/// Async HTTP client for the verification API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct ImeiCheckClient {
  client:   Client,
  endpoint: String,
  token:    String,
}

impl ImeiCheckClient {
  pub fn new(config: &CheckConfig) -> Result<Self> {
    let token = config.token();
    if token.is_empty() {
      return Err(Error::Config(format!(
        "no API token configured for the {} environment",
        config.environment
      )));
    }

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en"));

    let client = Client::builder()
      .default_headers(headers)
      .timeout(config.timeout)
      .build()?;

    Ok(Self {
      client,
      endpoint: format!("{}/v1/checks", config.base_url.trim_end_matches('/')),
      token: token.to_owned(),
    })
  }

  /// Send one check request for `imei` and decode the answer.
  pub async fn check_imei(&self, imei: &Imei) -> Result<CheckPayload> {
    let body = CheckRequest {
      device_id:  imei.as_str(),
      service_id: IMEI_CHECK_SERVICE_ID,
    };

    let resp = self
      .client
      .post(&self.endpoint)
      .bearer_auth(&self.token)
      .json(&body)
      .send()
      .await?;

    let status = resp.status();
    let bytes = resp.bytes().await?;
    debug!(%imei, %status, len = bytes.len(), "verification service responded");

    if !status.is_success() {
      return Err(Error::Status {
        status,
        body: String::from_utf8_lossy(&bytes).into_owned(),
      });
    }

    Ok(serde_json::from_slice(&bytes)?)
  }
}

impl CheckService for ImeiCheckClient {
  type Error = Error;

  async fn check(&self, imei: &Imei) -> Result<CheckPayload> { self.check_imei(imei).await }
}
