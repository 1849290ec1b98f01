//! The lookup service: validate, consult the cache, query the remote
//! service at most once per IMEI.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
  Imei,
  checker::CheckService,
  record::LookupRecord,
  store::{LookupCache, StoreError},
};

/// Why a lookup did not produce a record.
#[derive(Debug, Error)]
pub enum LookupError {
  /// The input is not a valid IMEI. Raised before any I/O.
  #[error("not a valid IMEI: {0:?}")]
  InvalidIdentifier(String),

  /// The verification service could not be reached or refused the request.
  #[error("lookup failed: {0}")]
  LookupFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Composes a [`LookupCache`] and a [`CheckService`].
///
/// Concurrent first-time lookups of the same IMEI may both reach the remote
/// service; the cache's uniqueness constraint lets exactly one of them store
/// its result, and the other returns the stored record instead of its own.
pub struct Lookup<S, C> {
  cache:   Arc<S>,
  checker: Arc<C>,
}

impl<S, C> Clone for Lookup<S, C> {
  fn clone(&self) -> Self {
    Self {
      cache:   Arc::clone(&self.cache),
      checker: Arc::clone(&self.checker),
    }
  }
}

impl<S, C> Lookup<S, C>
where
  S: LookupCache,
  C: CheckService,
{
  pub fn new(cache: Arc<S>, checker: Arc<C>) -> Self { Self { cache, checker } }

  pub fn cache(&self) -> &Arc<S> { &self.cache }

  /// Validate `raw` and look it up.
  ///
  /// Dropping the returned future before the remote call completes cancels
  /// that call and leaves the cache untouched.
  pub async fn lookup(&self, raw: &str) -> Result<LookupRecord, LookupError> {
    let imei = Imei::parse(raw)
      .map_err(|_| LookupError::InvalidIdentifier(raw.to_owned()))?;
    self.lookup_imei(&imei).await
  }

  /// Look up an already-validated IMEI.
  pub async fn lookup_imei(&self, imei: &Imei) -> Result<LookupRecord, LookupError> {
    if let Some(record) = self.cache.get(imei).await.map_err(store_error)? {
      debug!(%imei, "lookup cache hit");
      return Ok(record);
    }

    info!(%imei, "querying verification service");
    let payload = self.checker.check(imei).await.map_err(|e| {
      warn!(%imei, error = %e, "verification service call failed");
      LookupError::LookupFailed(Box::new(e))
    })?;

    let record = LookupRecord {
      imei: imei.clone(),
      payload,
      created_at: Utc::now(),
    };

    match self.cache.put(record.clone()).await {
      Ok(()) => Ok(record),
      Err(e) if e.is_duplicate_key() => {
        debug!(%imei, "lost insert race, re-reading stored record");
        self
          .cache
          .get(imei)
          .await
          .map_err(store_error)?
          .ok_or_else(|| LookupError::Store(Box::new(e)))
      }
      Err(e) => Err(store_error(e)),
    }
  }
}

fn store_error<E: StoreError>(e: E) -> LookupError { LookupError::Store(Box::new(e)) }
