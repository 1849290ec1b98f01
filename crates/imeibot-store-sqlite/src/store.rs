//! [`SqliteStore`]: the SQLite implementation of [`LookupCache`] and
//! [`UserStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::debug;

use imeibot_core::{
  Imei,
  record::LookupRecord,
  store::{LookupCache, UserStore},
  user::User,
};

use crate::{
  Error, Result,
  encode::{RawRecord, RawUser, encode_dt, encode_payload},
  schema::SCHEMA,
};

const SELECT_USER: &str =
  "SELECT tg_id, is_active, created_at FROM user WHERE tg_id = ?1";

fn raw_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    tg_id:      row.get(0)?,
    is_active:  row.get(1)?,
    created_at: row.get(2)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// The bot's persistent state in a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run an upsert on `user` for `tg_id` and read the row back.
  async fn upsert_user(&self, sql: &'static str, tg_id: i64, is_active: bool) -> Result<User> {
    let at_str = encode_dt(Utc::now());

    let raw: RawUser = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(sql, rusqlite::params![tg_id, is_active, at_str])?;
        let raw = tx.query_row(SELECT_USER, rusqlite::params![tg_id], raw_user)?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_user()
  }
}

// ─── LookupCache impl ────────────────────────────────────────────────────────

impl LookupCache for SqliteStore {
  type Error = Error;

  async fn get(&self, imei: &Imei) -> Result<Option<LookupRecord>> {
    let imei_str = imei.to_string();

    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT imei, json_data, created_at FROM imei WHERE imei = ?1",
            rusqlite::params![imei_str],
            |row| {
              Ok(RawRecord {
                imei:       row.get(0)?,
                json_data:  row.get(1)?,
                created_at: row.get(2)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn put(&self, record: LookupRecord) -> Result<()> {
    let imei_str = record.imei.to_string();
    let json_str = encode_payload(&record.payload)?;
    let at_str   = encode_dt(record.created_at);

    let key = imei_str.clone();
    let inserted = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT INTO imei (imei, json_data, created_at) VALUES (?1, ?2, ?3)
           ON CONFLICT (imei) DO NOTHING",
          rusqlite::params![key, json_str, at_str],
        )?;
        Ok(changed == 1)
      })
      .await?;

    if !inserted {
      debug!(imei = %imei_str, "insert rejected by unique constraint");
      return Err(Error::DuplicateKey(imei_str));
    }
    Ok(())
  }
}

// ─── UserStore impl ──────────────────────────────────────────────────────────

impl UserStore for SqliteStore {
  type Error = Error;

  async fn register(&self, tg_id: i64) -> Result<User> {
    self
      .upsert_user(
        "INSERT INTO user (tg_id, is_active, created_at) VALUES (?1, ?2, ?3)
         ON CONFLICT (tg_id) DO NOTHING",
        tg_id,
        false,
      )
      .await
  }

  async fn get_user(&self, tg_id: i64) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(SELECT_USER, rusqlite::params![tg_id], raw_user)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT tg_id, is_active, created_at FROM user ORDER BY created_at, tg_id",
        )?;
        let rows = stmt
          .query_map([], raw_user)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn set_active(&self, tg_id: i64, is_active: bool) -> Result<User> {
    self
      .upsert_user(
        "INSERT INTO user (tg_id, is_active, created_at) VALUES (?1, ?2, ?3)
         ON CONFLICT (tg_id) DO UPDATE SET is_active = excluded.is_active",
        tg_id,
        is_active,
      )
      .await
  }
}
