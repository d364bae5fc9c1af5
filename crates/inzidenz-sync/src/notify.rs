//! Pushing refresh results to subscribers.

use std::{future::Future, sync::Arc};

use inzidenz_core::{
  Result, SubscriberId,
  store::{RegionStore, SubscriptionStore},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{RefreshEvent, RefreshReport, Registry, format};

/// Outbound message transport, e.g. a chat bot API.
pub trait MessageSender: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Deliver plain `text` to one subscriber.
  fn send_message<'a>(
    &'a self,
    subscriber: SubscriberId,
    text: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

/// Consumes [`RefreshEvent`]s and sends every subscriber the current state of
/// the regions they follow.
pub struct Notifier<R, S, M> {
  registry: Arc<Registry<R, S>>,
  sender:   Arc<M>,
}

impl<R, S, M> Notifier<R, S, M>
where
  R: RegionStore,
  S: SubscriptionStore,
  M: MessageSender,
{
  pub fn new(registry: Arc<Registry<R, S>>, sender: Arc<M>) -> Self { Self { registry, sender } }

  /// Handle events until every sender of the channel is dropped.
  pub async fn run(self, mut events: mpsc::Receiver<RefreshEvent>) {
    info!("notifier started");
    while let Some(event) = events.recv().await {
      match self.notify_all(&event.report).await {
        Ok(sent) => debug!(sent, "refresh notifications done"),
        Err(e) => warn!(error = %e, "could not notify subscribers"),
      }
    }
    info!("event channel closed, notifier stopped");
  }

  /// Send one update message per subscriber. Returns how many were delivered.
  ///
  /// A cycle that applied nothing sends nothing. A failed delivery is logged
  /// and does not stop the remaining ones.
  pub async fn notify_all(&self, report: &RefreshReport) -> Result<usize> {
    if !report.has_changes() {
      debug!("refresh applied no changes, not notifying");
      return Ok(0);
    }

    let mut sent = 0;
    for subscriber in self.registry.all_subscribers().await? {
      let records = self.registry.regions_of(subscriber).await?;
      if records.is_empty() {
        continue;
      }

      let text = format::update_message(&records);
      match self.sender.send_message(subscriber, &text).await {
        Ok(()) => sent += 1,
        Err(e) => warn!(%subscriber, error = %e, "failed to deliver update"),
      }
    }

    info!(sent, "subscribers notified");
    Ok(sent)
  }
}
