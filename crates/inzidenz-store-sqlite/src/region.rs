//! [`SqliteRegionStore`]: region records, cursors and the search index.

use std::{collections::BTreeSet, path::Path};

use rusqlite::OptionalExtension as _;

use inzidenz_core::{
  LastUpdate, RegionId, RegionRecord,
  search::bucket_key,
  store::{RegionStore, SearchIndex},
};

use crate::{
  Error, Result,
  encode::{decode_record, encode_record},
  schema::REGION_SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Region data backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted. All access
/// is serialised on the connection thread, so every operation is atomic with
/// respect to the others.
#[derive(Clone)]
pub struct SqliteRegionStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteRegionStore {
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
        conn.execute_batch(REGION_SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Number of stored records.
  pub async fn count(&self) -> Result<usize> {
    let n: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM regions", [], |r| r.get(0))?))
      .await?;
    Ok(n as usize)
  }
}

// ─── RegionStore impl ────────────────────────────────────────────────────────

impl RegionStore for SqliteRegionStore {
  type Error = Error;

  async fn get(&self, id: RegionId) -> Result<Option<RegionRecord>> {
    let raw: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT record_json FROM regions WHERE object_id = ?1",
              rusqlite::params![id.0],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    raw.as_deref().map(decode_record).transpose()
  }

  async fn put(&self, id: RegionId, record: RegionRecord, last_update: LastUpdate) -> Result<()> {
    let record_json = encode_record(&record)?;
    let cursor = last_update.as_str().to_owned();

    self
      .conn
      .call(move |conn| {
        // Record and cursor commit together.
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO regions (object_id, record_json) VALUES (?1, ?2)
           ON CONFLICT (object_id) DO UPDATE SET record_json = excluded.record_json",
          rusqlite::params![id.0, record_json],
        )?;
        tx.execute(
          "INSERT INTO last_updated (object_id, last_update) VALUES (?1, ?2)
           ON CONFLICT (object_id) DO UPDATE SET last_update = excluded.last_update",
          rusqlite::params![id.0, cursor],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn exists(&self, id: RegionId) -> Result<bool> {
    let found = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM regions WHERE object_id = ?1",
              rusqlite::params![id.0],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(found)
  }

  async fn cursor(&self, id: RegionId) -> Result<Option<LastUpdate>> {
    let raw: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT last_update FROM last_updated WHERE object_id = ?1",
              rusqlite::params![id.0],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(raw.map(LastUpdate::new))
  }
}

// ─── SearchIndex impl ────────────────────────────────────────────────────────

impl SearchIndex for SqliteRegionStore {
  type Error = Error;

  async fn index(&self, record: &RegionRecord) -> Result<()> {
    let Some(bucket) = bucket_key(&record.city_area) else {
      return Ok(());
    };
    let id = record.object_id;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR IGNORE INTO city_search (bucket, object_id) VALUES (?1, ?2)",
          rusqlite::params![bucket, id.0],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn lookup(&self, name: &str) -> Result<BTreeSet<RegionId>> {
    let Some(bucket) = bucket_key(name) else {
      return Ok(BTreeSet::new());
    };

    let ids: Vec<i64> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare("SELECT object_id FROM city_search WHERE bucket = ?1")?;
        let rows = stmt
          .query_map(rusqlite::params![bucket], |r| r.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(ids.into_iter().map(RegionId).collect())
  }
}
