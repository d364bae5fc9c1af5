//! Periodic update checks.

use std::{sync::Arc, time::Duration};

use inzidenz_core::{
  feed::FeedSource,
  store::{RegionStore, SearchIndex},
};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info, warn};

use crate::{CheckOutcome, Updater};

/// Call [`Updater::check_update`] every `period`, starting immediately.
///
/// Errors are logged and the loop carries on with the next tick. Ticks
/// missed while a check runs long are dropped, not replayed.
pub async fn run<R, F>(updater: Arc<Updater<R, F>>, period: Duration)
where
  R: RegionStore + SearchIndex,
  F: FeedSource,
{
  let mut ticker = interval(period);
  ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
  info!(period = ?period, "update scheduler started");

  loop {
    ticker.tick().await;
    match updater.check_update().await {
      Ok(CheckOutcome::UpToDate) => info!("data is up to date"),
      Ok(CheckOutcome::Refreshed(report)) => info!(applied = report.applied, "data refreshed"),
      Ok(CheckOutcome::Skipped) => info!("refresh in progress, check skipped"),
      Err(e) if e.is_fetch_failure() => warn!(error = %e, "update check failed, retrying next tick"),
      Err(e) => error!(error = %e, "update check failed"),
    }
  }
}
