//! JSON API for the IMEI bot.
//!
//! Exposes an axum [`Router`] backed by a [`Lookup`] whose cache also stores
//! bot users. Auth, TLS, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest_service("/api", imeibot_api::api_router(lookup.clone()))
//! ```

pub mod error;
pub mod extract;
pub mod imei;
pub mod users;

use axum::{Router, routing::post};
use imeibot_core::{
  checker::CheckService,
  lookup::Lookup,
  store::{LookupCache, UserStore},
};

pub use error::{ApiError, FieldError};

/// Build the API router around `lookup`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, C>(lookup: Lookup<S, C>) -> Router<()>
where
  S: LookupCache + UserStore + 'static,
  C: CheckService + 'static,
{
  Router::new()
    .route("/check-imei/", post(imei::check::<S, C>))
    .route("/vite-list/", post(users::set_activation::<S, C>))
    .with_state(lookup)
}
