//! `POST /webhook`: updates pushed by Telegram.
//!
//! Only addresses in Telegram's ranges get through. Forwarding headers count
//! only when the connection comes from a configured trusted proxy. Accepted updates always
//! get a 200, even when handling fails, so Telegram does not redeliver them.

use std::net::SocketAddr;

use axum::{
  Json,
  extract::{ConnectInfo, Request, State},
  response::{IntoResponse, Response},
};
use imeibot_core::{
  checker::CheckService,
  store::{LookupCache, UserStore},
};
use imeibot_telegram::{Messenger, Update};
use serde_json::json;
use tracing::{error, warn};

use crate::{
  AppState,
  allowlist::{client_ip, is_telegram},
  error::Error,
};

const MAX_UPDATE_BYTES: usize = 1024 * 1024;

pub async fn handler<S, C, M>(State(state): State<AppState<S, C, M>>, req: Request) -> Response
where
  S: LookupCache + UserStore + 'static,
  C: CheckService + 'static,
  M: Messenger + 'static,
{
  let peer = req
    .extensions()
    .get::<ConnectInfo<SocketAddr>>()
    .map(|ConnectInfo(addr)| addr.ip());

  match client_ip(req.headers(), peer, &state.config.trusted_proxies) {
    Some(ip) if is_telegram(ip) => {}
    other => {
      warn!(client_ip = ?other, "webhook call from outside Telegram rejected");
      return Error::NotFromTelegram.into_response();
    }
  }

  let update = match axum::body::to_bytes(req.into_body(), MAX_UPDATE_BYTES).await {
    Ok(bytes) => serde_json::from_slice::<Update>(&bytes),
    Err(e) => {
      warn!(error = %e, "could not read webhook body");
      return ok();
    }
  };

  match update {
    Ok(update) => {
      let update_id = update.id.0;
      if let Err(e) = state.dispatcher.dispatch(update).await {
        error!(update_id, error = %e, "failed to handle update");
      }
    }
    Err(e) => warn!(error = %e, "undecodable update ignored"),
  }

  ok()
}

fn ok() -> Response { Json(json!({ "ok": true })).into_response() }
