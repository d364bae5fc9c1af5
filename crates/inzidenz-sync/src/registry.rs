//! The subscription registry: subscriber sets checked against region data.

use std::{collections::BTreeSet, sync::Arc};

use inzidenz_core::{
  Error, RegionId, RegionRecord, Result, SubscriberId,
  store::{RegionStore, SubscriptionStore},
};
use tracing::debug;

/// Subscriptions that only ever point at regions known to the region store.
pub struct Registry<R, S> {
  regions:       Arc<R>,
  subscriptions: S,
}

impl<R, S> Registry<R, S>
where
  R: RegionStore,
  S: SubscriptionStore,
{
  pub fn new(regions: Arc<R>, subscriptions: S) -> Self { Self { regions, subscriptions } }

  pub fn regions(&self) -> &Arc<R> { &self.regions }

  /// Subscribe to `region`. Returns `false`, and stores nothing, if the region
  /// is unknown. Subscribing twice is not an error.
  pub async fn subscribe(&self, subscriber: SubscriberId, region: RegionId) -> Result<bool> {
    if !self.regions.exists(region).await.map_err(Error::store)? {
      debug!(%subscriber, region_id = %region, "refusing subscription to unknown region");
      return Ok(false);
    }
    self
      .subscriptions
      .add(subscriber, region)
      .await
      .map_err(Error::store)?;
    Ok(true)
  }

  /// Returns `false` if the subscriber was not subscribed to `region`.
  pub async fn unsubscribe(&self, subscriber: SubscriberId, region: RegionId) -> Result<bool> {
    self
      .subscriptions
      .remove(subscriber, region)
      .await
      .map_err(Error::store)
  }

  pub async fn list(&self, subscriber: SubscriberId) -> Result<BTreeSet<RegionId>> {
    self.subscriptions.members(subscriber).await.map_err(Error::store)
  }

  /// Remove every subscription of `subscriber`. Returns `false` if there were
  /// none.
  pub async fn delete(&self, subscriber: SubscriberId) -> Result<bool> {
    self.subscriptions.delete(subscriber).await.map_err(Error::store)
  }

  pub async fn all_subscribers(&self) -> Result<Vec<SubscriberId>> {
    self.subscriptions.subscribers().await.map_err(Error::store)
  }

  /// Load the current records of everything `subscriber` follows, skipping
  /// ids that no longer resolve.
  pub async fn regions_of(&self, subscriber: SubscriberId) -> Result<Vec<RegionRecord>> {
    let mut records = Vec::new();
    for id in self.list(subscriber).await? {
      if let Some(record) = self.regions.get(id).await.map_err(Error::store)? {
        records.push(record);
      }
    }
    Ok(records)
  }
}
