//! The remote verification service, as seen by the core.

use std::future::Future;

use crate::{Imei, record::CheckPayload};

/// A client for the third-party IMEI verification service.
///
/// One call is one outbound request: implementations must not retry or
/// cache. Retry policy belongs to the caller and caching to
/// [`Lookup`](crate::lookup::Lookup).
pub trait CheckService: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Ask the service about `imei`.
  fn check<'a>(
    &'a self,
    imei: &'a Imei,
  ) -> impl Future<Output = Result<CheckPayload, Self::Error>> + Send + 'a;
}
