//! Runtime configuration, deserialised from `config.toml` and `INZIDENZ_*`
//! environment variables.

use std::{path::PathBuf, time::Duration};

use inzidenz_core::Error;
use inzidenz_sync::{
  FeedConfig,
  feed::{DEFAULT_FULL_FEED_URL, DEFAULT_UPDATE_FEED_URL},
};
use serde::Deserialize;

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

const SECS_PER_HOUR: u64 = 60 * 60;

#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
  /// Only needed by the bot service; local queries run without it.
  #[serde(default)]
  pub telegram_token:        String,
  #[serde(default = "default_telegram_api_url")]
  pub telegram_api_url:      String,
  #[serde(default = "default_database_directory")]
  pub database_directory:    PathBuf,
  #[serde(default = "default_update_interval_hours")]
  pub update_interval_hours: u64,
  #[serde(default = "default_update_feed_url")]
  pub update_feed_url:       String,
  #[serde(default = "default_full_feed_url")]
  pub full_feed_url:         String,
  /// Long-poll timeout for `getUpdates`.
  #[serde(default = "default_poll_timeout_secs")]
  pub poll_timeout_secs:     u64,
}

fn default_telegram_api_url() -> String { DEFAULT_TELEGRAM_API_URL.to_string() }
fn default_database_directory() -> PathBuf { PathBuf::from("data") }
fn default_update_interval_hours() -> u64 { 1 }
fn default_update_feed_url() -> String { DEFAULT_UPDATE_FEED_URL.to_string() }
fn default_full_feed_url() -> String { DEFAULT_FULL_FEED_URL.to_string() }
fn default_poll_timeout_secs() -> u64 { 30 }

impl BotConfig {
  /// Reject values the services cannot run with.
  pub fn validate(&self) -> Result<(), Error> {
    if self.update_interval_hours == 0 {
      return Err(Error::InvalidArgument(
        "update_interval_hours must be greater than 0".into(),
      ));
    }
    if self.update_interval_hours.checked_mul(SECS_PER_HOUR).is_none() {
      return Err(Error::InvalidArgument(format!(
        "update_interval_hours {} is out of range",
        self.update_interval_hours
      )));
    }
    Ok(())
  }

  /// The bot token, or an error if none is configured.
  pub fn token(&self) -> Result<&str, Error> {
    if self.telegram_token.is_empty() {
      return Err(Error::InvalidArgument("telegram_token is not set".into()));
    }
    Ok(&self.telegram_token)
  }

  /// Saturates for values [`BotConfig::validate`] rejects.
  pub fn update_interval(&self) -> Duration {
    Duration::from_secs(self.update_interval_hours.saturating_mul(SECS_PER_HOUR))
  }

  pub fn feed(&self) -> FeedConfig {
    FeedConfig {
      update_url: self.update_feed_url.clone(),
      full_url:   self.full_feed_url.clone(),
    }
  }

  pub fn regions_db(&self) -> PathBuf { self.database_directory.join("regions.db") }

  pub fn subscriptions_db(&self) -> PathBuf { self.database_directory.join("subscriptions.db") }
}
