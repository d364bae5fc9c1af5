//! Integration tests for the SQLite stores against in-memory databases.

use std::collections::BTreeSet;

use inzidenz_core::{
  LastUpdate, RegionId, RegionRecord, SubscriberId,
  store::{RegionStore, SearchIndex, SubscriptionStore},
};

use crate::{SqliteRegionStore, SqliteSubscriptionStore};

async fn regions() -> SqliteRegionStore {
  SqliteRegionStore::open_in_memory()
    .await
    .expect("in-memory region store")
}

async fn subscriptions() -> SqliteSubscriptionStore {
  SqliteSubscriptionStore::open_in_memory()
    .await
    .expect("in-memory subscription store")
}

fn record(id: i64, name: &str, last_update: &str) -> RegionRecord {
  RegionRecord {
    object_id:             RegionId(id),
    state:                 "Bayern".into(),
    county:                format!("LK {name}"),
    city_area:             name.into(),
    city_area_description: "Landkreis".into(),
    last_update:           LastUpdate::from(last_update),
    cases:                 100,
    cases_per_100k:        Some(1234.5),
    cases7_per_100k:       Some(56.78),
    cases7_bl_per_100k:    Some(60.0),
  }
}

async fn put(s: &SqliteRegionStore, r: RegionRecord) {
  let cursor = r.last_update.clone();
  s.put(r.object_id, r, cursor).await.unwrap();
}

// ─── Region records ──────────────────────────────────────────────────────────

#[tokio::test]
async fn put_and_get_record() {
  let s = regions().await;
  put(&s, record(1, "Bamberg", "2021-01-01")).await;

  let fetched = s.get(RegionId(1)).await.unwrap();
  assert_eq!(fetched, Some(record(1, "Bamberg", "2021-01-01")));
  assert!(s.exists(RegionId(1)).await.unwrap());
  assert_eq!(
    s.cursor(RegionId(1)).await.unwrap(),
    Some(LastUpdate::from("2021-01-01"))
  );
}

#[tokio::test]
async fn missing_region_is_absent() {
  let s = regions().await;
  assert!(s.get(RegionId(404)).await.unwrap().is_none());
  assert!(!s.exists(RegionId(404)).await.unwrap());
  assert!(s.cursor(RegionId(404)).await.unwrap().is_none());
}

#[tokio::test]
async fn put_overwrites_record_and_cursor() {
  let s = regions().await;
  put(&s, record(1, "Bamberg", "2021-01-01")).await;

  let mut newer = record(1, "Bamberg", "2021-01-02");
  newer.cases = 150;
  put(&s, newer.clone()).await;

  assert_eq!(s.get(RegionId(1)).await.unwrap(), Some(newer));
  assert_eq!(
    s.cursor(RegionId(1)).await.unwrap(),
    Some(LastUpdate::from("2021-01-02"))
  );
  assert_eq!(s.count().await.unwrap(), 1);
}

#[tokio::test]
async fn put_does_not_check_staleness() {
  let s = regions().await;
  put(&s, record(1, "Bamberg", "2021-01-02")).await;
  put(&s, record(1, "Bamberg", "2021-01-01")).await;

  assert_eq!(
    s.cursor(RegionId(1)).await.unwrap(),
    Some(LastUpdate::from("2021-01-01"))
  );
}

#[tokio::test]
async fn optional_numbers_roundtrip_as_none() {
  let s = regions().await;
  let mut r = record(3, "Coburg", "2021-01-01");
  r.cases_per_100k = None;
  r.cases7_per_100k = None;
  r.cases7_bl_per_100k = None;
  put(&s, r.clone()).await;

  assert_eq!(s.get(RegionId(3)).await.unwrap(), Some(r));
}

// ─── Search index ────────────────────────────────────────────────────────────

#[tokio::test]
async fn lookup_is_case_insensitive() {
  let s = regions().await;
  s.index(&record(1, "München", "2021-01-01")).await.unwrap();
  s.index(&record(2, "Mühldorf a.Inn", "2021-01-01")).await.unwrap();
  s.index(&record(3, "Bamberg", "2021-01-01")).await.unwrap();

  let lower = s.lookup("mü").await.unwrap();
  let upper = s.lookup("MÜ").await.unwrap();
  assert_eq!(lower, upper);
  assert_eq!(lower, BTreeSet::from([RegionId(1), RegionId(2)]));
}

#[tokio::test]
async fn index_is_idempotent() {
  let s = regions().await;
  let r = record(1, "Bamberg", "2021-01-01");
  s.index(&r).await.unwrap();
  s.index(&r).await.unwrap();

  assert_eq!(s.lookup("b").await.unwrap().len(), 1);
}

#[tokio::test]
async fn rename_keeps_old_bucket_entry() {
  let s = regions().await;
  s.index(&record(1, "Aachen", "2021-01-01")).await.unwrap();
  s.index(&record(1, "Städteregion Aachen", "2021-01-02")).await.unwrap();

  assert!(s.lookup("A").await.unwrap().contains(&RegionId(1)));
  assert!(s.lookup("S").await.unwrap().contains(&RegionId(1)));
}

#[tokio::test]
async fn empty_names_and_queries_are_ignored() {
  let s = regions().await;
  s.index(&record(1, "", "2021-01-01")).await.unwrap();

  assert!(s.lookup("").await.unwrap().is_empty());
}

// ─── Subscriptions ───────────────────────────────────────────────────────────

#[tokio::test]
async fn add_list_and_remove() {
  let s = subscriptions().await;
  let alice = SubscriberId(42);

  assert!(s.add(alice, RegionId(1)).await.unwrap());
  assert!(!s.add(alice, RegionId(1)).await.unwrap());
  assert!(s.add(alice, RegionId(2)).await.unwrap());

  assert_eq!(
    s.members(alice).await.unwrap(),
    BTreeSet::from([RegionId(1), RegionId(2)])
  );

  assert!(s.remove(alice, RegionId(1)).await.unwrap());
  assert!(!s.remove(alice, RegionId(1)).await.unwrap());
  assert_eq!(s.members(alice).await.unwrap(), BTreeSet::from([RegionId(2)]));
}

#[tokio::test]
async fn delete_drops_all_of_one_subscriber() {
  let s = subscriptions().await;
  s.add(SubscriberId(1), RegionId(10)).await.unwrap();
  s.add(SubscriberId(1), RegionId(11)).await.unwrap();
  s.add(SubscriberId(2), RegionId(10)).await.unwrap();

  assert!(s.delete(SubscriberId(1)).await.unwrap());
  assert!(!s.delete(SubscriberId(1)).await.unwrap());

  assert!(s.members(SubscriberId(1)).await.unwrap().is_empty());
  assert_eq!(s.subscribers().await.unwrap(), vec![SubscriberId(2)]);
}

#[tokio::test]
async fn subscribers_are_distinct_and_sorted() {
  let s = subscriptions().await;
  s.add(SubscriberId(9), RegionId(1)).await.unwrap();
  s.add(SubscriberId(-3), RegionId(1)).await.unwrap();
  s.add(SubscriberId(9), RegionId(2)).await.unwrap();

  assert_eq!(
    s.subscribers().await.unwrap(),
    vec![SubscriberId(-3), SubscriberId(9)]
  );
}
