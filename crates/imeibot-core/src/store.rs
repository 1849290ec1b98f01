//! Persistence traits.
//!
//! Implemented by storage backends (e.g. `imeibot-store-sqlite`). Higher
//! layers depend on these abstractions, not on any concrete backend.

use std::future::Future;

use crate::{Imei, record::LookupRecord, user::User};

/// Errors a [`LookupCache`] can report.
///
/// The uniqueness constraint on the IMEI key is the only concurrency control
/// between requests, so callers must be able to tell a lost insert race from
/// a genuine failure.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// `true` if a record already existed for the key being inserted.
  fn is_duplicate_key(&self) -> bool;
}

// ─── Lookup cache ────────────────────────────────────────────────────────────

/// Maps a validated IMEI to the lookup result fetched for it.
///
/// Records are write-once: `put` never overwrites, it reports a duplicate key.
pub trait LookupCache: Send + Sync {
  type Error: StoreError;

  /// Return the stored record for `imei`, if any.
  fn get<'a>(
    &'a self,
    imei: &'a Imei,
  ) -> impl Future<Output = Result<Option<LookupRecord>, Self::Error>> + Send + 'a;

  /// Store a new record. Fails with a duplicate-key error if `record.imei`
  /// is already present.
  fn put(
    &self,
    record: LookupRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Users ───────────────────────────────────────────────────────────────────

/// Bot users keyed by Telegram id.
pub trait UserStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert `tg_id` as an inactive user if it is not known yet, and return
  /// the stored user either way.
  fn register(
    &self,
    tg_id: i64,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user. Returns `None` if not found.
  fn get_user(
    &self,
    tg_id: i64,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// All users, oldest first.
  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Set the activation flag, creating the user first if needed. Returns the
  /// user as stored afterwards.
  fn set_active(
    &self,
    tg_id: i64,
    is_active: bool,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;
}
