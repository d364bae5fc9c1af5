//! Storage traits for region data and subscriptions.
//!
//! The traits are implemented by storage backends (e.g.
//! `inzidenz-store-sqlite`). The sync pipeline and the bot depend on these
//! abstractions, not on any concrete backend.
//!
//! Region data and subscriptions are separate stores: a backend keeps their
//! keys in independent namespaces.

use std::{collections::BTreeSet, future::Future};

use crate::{
  region::{LastUpdate, RegionId, RegionRecord},
  subscription::SubscriberId,
};

// ─── Region data ─────────────────────────────────────────────────────────────

/// Region id → last-known record plus its last-update cursor.
///
/// Every method is atomic per key: a reader never observes a record without
/// its cursor or half of a record.
pub trait RegionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Retrieve a record. Returns `None` if the region was never stored.
  fn get(
    &self,
    id: RegionId,
  ) -> impl Future<Output = Result<Option<RegionRecord>, Self::Error>> + Send + '_;

  /// Overwrite the record and cursor for `id` unconditionally.
  ///
  /// The caller is responsible for the staleness check. Writing the same
  /// record twice is harmless.
  fn put(
    &self,
    id: RegionId,
    record: RegionRecord,
    last_update: LastUpdate,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn exists(
    &self,
    id: RegionId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// The last applied `last_update` for `id`, without loading the record.
  fn cursor(
    &self,
    id: RegionId,
  ) -> impl Future<Output = Result<Option<LastUpdate>, Self::Error>> + Send + '_;
}

/// Name bucket → region ids, used to narrow fuzzy searches.
///
/// The index is append-only: when a region is renamed its id stays in the old
/// bucket as well. Callers must treat lookups as candidates and re-check the
/// current record.
pub trait SearchIndex: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Add the record's id under the bucket of its city/area name.
  fn index<'a>(
    &'a self,
    record: &'a RegionRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Candidate ids under the bucket of `name`'s first character.
  fn lookup<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<BTreeSet<RegionId>, Self::Error>> + Send + 'a;
}

// ─── Subscriptions ───────────────────────────────────────────────────────────

/// Subscriber id → set of region ids.
///
/// This is the raw set store; existence checks against region data live in
/// the registry built on top of it.
pub trait SubscriptionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Add `region` to the subscriber's set. Returns `false` if it was already
  /// present.
  fn add(
    &self,
    subscriber: SubscriberId,
    region: RegionId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Remove `region` from the subscriber's set. Returns `false` if it was not
  /// present.
  fn remove(
    &self,
    subscriber: SubscriberId,
    region: RegionId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn members(
    &self,
    subscriber: SubscriberId,
  ) -> impl Future<Output = Result<BTreeSet<RegionId>, Self::Error>> + Send + '_;

  /// Drop the subscriber's whole set. Returns `false` if it had none.
  fn delete(
    &self,
    subscriber: SubscriberId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Every subscriber with at least one subscription, in ascending order.
  fn subscribers(
    &self,
  ) -> impl Future<Output = Result<Vec<SubscriberId>, Self::Error>> + Send + '_;
}
