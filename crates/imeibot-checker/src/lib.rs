//! HTTP client for the imeicheck.net verification API.
//!
//! Implements [`imeibot_core::checker::CheckService`]. One call to
//! [`ImeiCheckClient::check_imei`] is exactly one `POST /v1/checks`; there is no
//! retry and no caching at this layer.

mod client;
mod config;

pub mod error;

pub use client::ImeiCheckClient;
pub use config::{CheckConfig, CheckEnvironment, DEFAULT_BASE_URL, IMEI_CHECK_SERVICE_ID};
pub use error::{Error, Result};
