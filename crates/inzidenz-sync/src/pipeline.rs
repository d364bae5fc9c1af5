//! Update detection and the refresh pipeline.
//!
//! [`Updater::check_update`] polls the cheap staleness feed and escalates to
//! a full [`Updater::refresh`] only when some region looks stale. A refresh
//! applies every record that is newer than its cursor and then announces the
//! completed cycle on the event channel, once.
//!
//! Both entry points share a run lock, so refreshes never overlap.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use inzidenz_core::{
  Error, Result,
  feed::FeedSource,
  store::{RegionStore, SearchIndex},
};
use tokio::sync::{
  Mutex,
  mpsc::{self, error::TrySendError},
};
use tracing::{debug, info, warn};

// ─── Reports and events ──────────────────────────────────────────────────────

/// Counters for one completed refresh cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshReport {
  /// Records in the full feed.
  pub fetched:      usize,
  /// Records written because they were new or newer than their cursor.
  pub applied:      usize,
  /// Records skipped because the stored copy was already current.
  pub unchanged:    usize,
  pub completed_at: DateTime<Utc>,
}

impl RefreshReport {
  pub fn has_changes(&self) -> bool { self.applied > 0 }
}

/// Sent once per completed refresh. Carries no diff; consumers read the
/// current state from the stores.
#[derive(Debug, Clone)]
pub struct RefreshEvent {
  pub report: RefreshReport,
}

/// Result of one [`Updater::check_update`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
  /// Every feed entry matched its stored cursor.
  UpToDate,
  /// A stale region was found and a refresh ran.
  Refreshed(RefreshReport),
  /// Another refresh held the run lock; nothing was fetched.
  Skipped,
}

// ─── Updater ─────────────────────────────────────────────────────────────────

/// Owns the feed source and drives detection and refresh against a store.
pub struct Updater<R, F> {
  store:    Arc<R>,
  feed:     F,
  events:   mpsc::Sender<RefreshEvent>,
  run_lock: Mutex<()>,
}

impl<R, F> Updater<R, F>
where
  R: RegionStore + SearchIndex,
  F: FeedSource,
{
  pub fn new(store: Arc<R>, feed: F, events: mpsc::Sender<RefreshEvent>) -> Self {
    Self { store, feed, events, run_lock: Mutex::new(()) }
  }

  pub fn store(&self) -> &Arc<R> { &self.store }

  /// Poll the staleness feed and refresh if any region is new or newer than
  /// its cursor.
  ///
  /// Scanning stops at the first stale entry; the refresh re-checks every
  /// record itself. Returns [`CheckOutcome::Skipped`] without fetching if a
  /// refresh is already running.
  pub async fn check_update(&self) -> Result<CheckOutcome> {
    let Ok(_guard) = self.run_lock.try_lock() else {
      debug!("refresh already in progress, skipping update check");
      return Ok(CheckOutcome::Skipped);
    };

    let entries = self
      .feed
      .fetch_last_updates()
      .await
      .map_err(Error::fetch)?
      .into_attributes()?;

    for entry in entries {
      let cursor = self
        .store
        .cursor(entry.object_id)
        .await
        .map_err(Error::store)?;

      if entry.last_update.is_newer_than(cursor.as_ref()) {
        info!(
          region_id = %entry.object_id,
          remote = %entry.last_update,
          "found old data, updating all data"
        );
        let report = self.refresh_locked().await?;
        return Ok(CheckOutcome::Refreshed(report));
      }
    }

    debug!("all regions up to date");
    Ok(CheckOutcome::UpToDate)
  }

  /// Run a full refresh, waiting for any refresh already in flight.
  pub async fn refresh(&self) -> Result<RefreshReport> {
    let _guard = self.run_lock.lock().await;
    self.refresh_locked().await
  }

  /// Fetch everything, apply newer records, then emit one event.
  ///
  /// The whole feed is fetched and validated before the first write, so a
  /// failed or malformed fetch leaves the store untouched and emits nothing.
  /// The event is dropped, not awaited, when the channel is full.
  async fn refresh_locked(&self) -> Result<RefreshReport> {
    let records = self
      .feed
      .fetch_regions()
      .await
      .map_err(Error::fetch)?
      .into_attributes()?;

    let fetched = records.len();
    let mut applied = 0;

    for record in records {
      let id = record.object_id;
      let cursor = self.store.cursor(id).await.map_err(Error::store)?;

      if !record.last_update.is_newer_than(cursor.as_ref()) {
        debug!(region_id = %id, "data up to date");
        continue;
      }

      debug!(region_id = %id, last_update = %record.last_update, "update/insert data");
      // The cursor is written last; a failed index write leaves it stale.
      self.store.index(&record).await.map_err(Error::store)?;
      let last_update = record.last_update.clone();
      self
        .store
        .put(id, record, last_update)
        .await
        .map_err(Error::store)?;
      applied += 1;
    }

    let report = RefreshReport {
      fetched,
      applied,
      unchanged: fetched - applied,
      completed_at: Utc::now(),
    };
    info!(
      fetched = report.fetched,
      applied = report.applied,
      unchanged = report.unchanged,
      "refresh complete"
    );

    // Never wait on the notifier while holding the run lock.
    match self.events.try_send(RefreshEvent { report: report.clone() }) {
      Ok(()) => {}
      Err(TrySendError::Full(_)) => warn!("notification channel full, refresh event dropped"),
      Err(TrySendError::Closed(_)) => warn!("notification channel closed, refresh event dropped"),
    }

    Ok(report)
  }
}
