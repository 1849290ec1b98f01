//! Integration tests for `SqliteStore` against an in-memory database.

use std::sync::{
  Arc,
  atomic::{AtomicUsize, Ordering},
};

use chrono::Utc;
use imeibot_core::{
  Imei,
  checker::CheckService,
  lookup::Lookup,
  record::{CheckPayload, DeviceProperties, LookupRecord},
  store::{LookupCache, StoreError, UserStore},
};
use serde_json::json;
use tokio::sync::Barrier;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn imei(s: &str) -> Imei { Imei::parse(s).unwrap() }

fn record(imei_str: &str, device: &str) -> LookupRecord {
  let mut properties = DeviceProperties {
    device_name: Some(device.into()),
    meid:        Some("Test MEID".into()),
    imei2:       Some("Test IMEI2".into()),
    serial:      Some("Test Serial".into()),
    ..Default::default()
  };
  properties.extra.insert("blacklisted".into(), json!(false));

  let mut extra = serde_json::Map::new();
  extra.insert("status".into(), json!("successful"));

  LookupRecord {
    imei:       imei(imei_str),
    payload:    CheckPayload { properties, extra },
    created_at: Utc::now(),
  }
}

// ─── Lookup cache ────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  let got = s.get(&imei("356735111052198")).await.unwrap();
  assert!(got.is_none());
}

#[tokio::test]
async fn put_then_get_roundtrips_payload() {
  let s = store().await;
  let rec = record("356735111052198", "iPhone 12");

  s.put(rec.clone()).await.unwrap();

  let got = s.get(&rec.imei).await.unwrap().unwrap();
  assert_eq!(got, rec);
  assert_eq!(got.payload.properties.extra["blacklisted"], json!(false));
  assert_eq!(got.payload.extra["status"], json!("successful"));
}

#[tokio::test]
async fn second_put_is_duplicate_and_does_not_overwrite() {
  let s = store().await;
  let first = record("356735111052198", "First");
  s.put(first.clone()).await.unwrap();

  let err = s
    .put(record("356735111052198", "Second"))
    .await
    .unwrap_err();
  assert!(err.is_duplicate_key());
  assert!(matches!(err, crate::Error::DuplicateKey(ref k) if k == "356735111052198"));

  let got = s.get(&first.imei).await.unwrap().unwrap();
  assert_eq!(got.payload.properties.device_name.as_deref(), Some("First"));
}

#[tokio::test]
async fn records_are_keyed_per_imei() {
  let s = store().await;
  s.put(record("356735111052198", "A")).await.unwrap();
  s.put(record("490014205973850", "B")).await.unwrap();

  let a = s.get(&imei("356735111052198")).await.unwrap().unwrap();
  let b = s.get(&imei("490014205973850")).await.unwrap().unwrap();
  assert_eq!(a.payload.properties.device_name.as_deref(), Some("A"));
  assert_eq!(b.payload.properties.device_name.as_deref(), Some("B"));
}

#[test]
fn non_duplicate_errors_are_not_flagged_as_duplicates() {
  let err = crate::Error::DateParse("bad".into());
  assert!(!err.is_duplicate_key());
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_creates_inactive_user_once() {
  let s = store().await;

  let u = s.register(42).await.unwrap();
  assert_eq!(u.tg_id, 42);
  assert!(!u.is_active);

  let again = s.register(42).await.unwrap();
  assert_eq!(again, u);
  assert_eq!(s.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn register_keeps_existing_activation() {
  let s = store().await;
  s.set_active(7, true).await.unwrap();

  let u = s.register(7).await.unwrap();
  assert!(u.is_active);
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user(1).await.unwrap().is_none());
}

#[tokio::test]
async fn set_active_toggles_and_creates() {
  let s = store().await;

  // Unknown user is created with the requested flag.
  let u = s.set_active(123456, true).await.unwrap();
  assert!(u.is_active);

  let u = s.set_active(123456, false).await.unwrap();
  assert!(!u.is_active);

  let fetched = s.get_user(123456).await.unwrap().unwrap();
  assert!(!fetched.is_active);
  assert_eq!(fetched.created_at, u.created_at);
}

#[tokio::test]
async fn list_users_oldest_first() {
  let s = store().await;
  for id in [3, 1, 2] {
    s.register(id).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
  }

  let ids: Vec<i64> = s
    .list_users()
    .await
    .unwrap()
    .into_iter()
    .map(|u| u.tg_id)
    .collect();
  assert_eq!(ids, vec![3, 1, 2]);
}

// ─── Lookup through the store ────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("unreachable")]
struct Never;

struct RacingChecker {
  calls:   AtomicUsize,
  barrier: Barrier,
}

impl CheckService for RacingChecker {
  type Error = Never;

  async fn check(&self, imei: &Imei) -> Result<CheckPayload, Never> {
    let call = self.calls.fetch_add(1, Ordering::SeqCst);
    self.barrier.wait().await;
    let mut payload = record(imei.as_str(), &format!("call {call}")).payload;
    payload.extra.insert("call".into(), json!(call));
    Ok(payload)
  }
}

#[tokio::test]
async fn concurrent_lookups_store_exactly_one_record() {
  let s = Arc::new(store().await);
  let checker = Arc::new(RacingChecker {
    calls:   AtomicUsize::new(0),
    barrier: Barrier::new(2),
  });
  let lookup = Lookup::new(s.clone(), checker.clone());

  let (a, b) = tokio::join!(
    lookup.lookup("356735111052198"),
    lookup.lookup("356735111052198"),
  );
  let (a, b) = (a.unwrap(), b.unwrap());

  assert_eq!(checker.calls.load(Ordering::SeqCst), 2);
  assert_eq!(a, b);

  let stored = s.get(&imei("356735111052198")).await.unwrap().unwrap();
  assert_eq!(stored, a);
}
