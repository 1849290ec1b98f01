//! HTTP front of the IMEI bot.
//!
//! Serves the Telegram webhook at `/webhook` and the token-protected JSON API
//! under `/api`, backed by any [`LookupCache`] + [`UserStore`].

pub mod allowlist;
pub mod auth;
pub mod error;
pub mod handlers;

pub use allowlist::Ipv4Net;
pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware, routing::post};
use imeibot_checker::{CheckConfig, CheckEnvironment, DEFAULT_BASE_URL};
use imeibot_core::{
  checker::CheckService,
  lookup::Lookup,
  store::{LookupCache, UserStore},
};
use imeibot_telegram::{Dispatcher, Messenger};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration, from `config.toml` and the environment.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                  String,
  #[serde(default = "default_port")]
  pub port:                  u16,
  /// Telegram bot token; doubles as the API bearer token.
  pub bot_token:             String,
  /// Public base URL; Telegram is told to post to `<webhook_url>/webhook`.
  pub webhook_url:           String,
  pub imei_token_sandbox:    String,
  pub imei_token_production: String,
  #[serde(default)]
  pub imei_environment:      CheckEnvironment,
  #[serde(default = "default_imei_api_url")]
  pub imei_api_url:          String,
  #[serde(default = "default_database_path")]
  pub database_path:         PathBuf,
  #[serde(default)]
  pub admin_ids:             Vec<i64>,
  /// Reverse proxies whose `X-Real-IP` / `X-Forwarded-For` are believed.
  #[serde(default)]
  pub trusted_proxies:       Vec<Ipv4Net>,
}

fn default_host() -> String { "0.0.0.0".into() }

fn default_port() -> u16 { 8000 }

fn default_imei_api_url() -> String { DEFAULT_BASE_URL.into() }

fn default_database_path() -> PathBuf { PathBuf::from("db.sqlite3") }

impl ServerConfig {
  pub fn check_config(&self) -> CheckConfig {
    let mut cfg = CheckConfig::new(
      self.imei_token_sandbox.clone(),
      self.imei_token_production.clone(),
    );
    cfg.base_url = self.imei_api_url.clone();
    cfg.environment = self.imei_environment;
    cfg
  }

  pub fn webhook_endpoint(&self) -> String {
    format!("{}/webhook", self.webhook_url.trim_end_matches('/'))
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, C, M> {
  pub lookup:     Lookup<S, C>,
  pub dispatcher: Dispatcher<S, C, M>,
  pub config:     Arc<ServerConfig>,
}

impl<S, C, M> Clone for AppState<S, C, M> {
  fn clone(&self) -> Self {
    Self {
      lookup:     self.lookup.clone(),
      dispatcher: self.dispatcher.clone(),
      config:     Arc::clone(&self.config),
    }
  }
}

impl<S, C, M> AppState<S, C, M>
where
  S: LookupCache + UserStore,
  C: CheckService,
  M: Messenger,
{
  pub fn new(store: Arc<S>, checker: Arc<C>, messenger: Arc<M>, config: Arc<ServerConfig>) -> Self {
    let lookup = Lookup::new(store, checker);
    let dispatcher = Dispatcher::new(lookup.clone(), messenger, config.admin_ids.clone());
    Self { lookup, dispatcher, config }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S, C, M>(state: AppState<S, C, M>) -> Router
where
  S: LookupCache + UserStore + 'static,
  C: CheckService + 'static,
  M: Messenger + 'static,
{
  let api = imeibot_api::api_router(state.lookup.clone()).layer(
    middleware::from_fn_with_state(Arc::clone(&state.config), auth::require_token),
  );

  Router::new()
    .route("/webhook", post(handlers::webhook::handler::<S, C, M>))
    .nest_service("/api", api)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
