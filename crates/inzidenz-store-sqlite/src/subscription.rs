//! [`SqliteSubscriptionStore`]: subscriber → region id sets.

use std::{collections::BTreeSet, path::Path};

use inzidenz_core::{RegionId, SubscriberId, store::SubscriptionStore};

use crate::{Error, Result, schema::SUBSCRIPTION_SCHEMA};

/// Subscriptions backed by their own SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteSubscriptionStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteSubscriptionStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
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
        conn.execute_batch(SUBSCRIPTION_SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

impl SubscriptionStore for SqliteSubscriptionStore {
  type Error = Error;

  async fn add(&self, subscriber: SubscriberId, region: RegionId) -> Result<bool> {
    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT OR IGNORE INTO user_city (subscriber_id, object_id) VALUES (?1, ?2)",
          rusqlite::params![subscriber.0, region.0],
        )?)
      })
      .await?;
    Ok(inserted > 0)
  }

  async fn remove(&self, subscriber: SubscriberId, region: RegionId) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM user_city WHERE subscriber_id = ?1 AND object_id = ?2",
          rusqlite::params![subscriber.0, region.0],
        )?)
      })
      .await?;
    Ok(removed > 0)
  }

  async fn members(&self, subscriber: SubscriberId) -> Result<BTreeSet<RegionId>> {
    let ids: Vec<i64> = self
      .conn
      .call(move |conn| {
        let mut stmt =
          conn.prepare("SELECT object_id FROM user_city WHERE subscriber_id = ?1")?;
        let rows = stmt
          .query_map(rusqlite::params![subscriber.0], |r| r.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(ids.into_iter().map(RegionId).collect())
  }

  async fn delete(&self, subscriber: SubscriberId) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM user_city WHERE subscriber_id = ?1",
          rusqlite::params![subscriber.0],
        )?)
      })
      .await?;
    Ok(removed > 0)
  }

  async fn subscribers(&self) -> Result<Vec<SubscriberId>> {
    let ids: Vec<i64> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT DISTINCT subscriber_id FROM user_city ORDER BY subscriber_id")?;
        let rows = stmt
          .query_map([], |r| r.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(ids.into_iter().map(SubscriberId).collect())
  }
}
