//! HTTP [`FeedSource`] for the RKI district feature service.

use std::time::Duration;

use inzidenz_core::{
  RegionRecord,
  feed::{FeatureSet, FeedSource},
  region::LastUpdateEntry,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Staleness feed: only `OBJECTID` and `last_update` per district.
pub const DEFAULT_UPDATE_FEED_URL: &str = "https://services7.arcgis.com/mOBPykOjAyBO2ZKk/arcgis/rest/services/RKI_Landkreisdaten/FeatureServer/0/query?where=1%3D1&outFields=OBJECTID,last_update&returnGeometry=false&outSR=4326&f=json";

/// Full feed: every attribute the records carry.
pub const DEFAULT_FULL_FEED_URL: &str = "https://services7.arcgis.com/mOBPykOjAyBO2ZKk/arcgis/rest/services/RKI_Landkreisdaten/FeatureServer/0/query?where=1%3D1&outFields=OBJECTID,BL,county,GEN,BEZ,last_update,cases7_per_100k,cases_per_100k,cases7_bl_per_100k,cases&returnGeometry=false&outSR=4326&f=json";

/// Endpoints of the two feeds.
#[derive(Debug, Clone)]
pub struct FeedConfig {
  pub update_url: String,
  pub full_url:   String,
}

impl Default for FeedConfig {
  fn default() -> Self {
    Self {
      update_url: DEFAULT_UPDATE_FEED_URL.to_string(),
      full_url:   DEFAULT_FULL_FEED_URL.to_string(),
    }
  }
}

/// Async client for the feature-service query endpoints.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ArcGisFeed {
  client: Client,
  config: FeedConfig,
}

impl ArcGisFeed {
  pub fn new(config: FeedConfig) -> reqwest::Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, config })
  }

  async fn query<A>(&self, url: &str) -> reqwest::Result<FeatureSet<A>>
  where
    A: DeserializeOwned + Send,
  {
    self
      .client
      .get(url)
      .send()
      .await?
      .error_for_status()?
      .json()
      .await
  }
}

impl FeedSource for ArcGisFeed {
  type Error = reqwest::Error;

  async fn fetch_last_updates(&self) -> reqwest::Result<FeatureSet<LastUpdateEntry>> {
    debug!(url = %self.config.update_url, "fetching staleness feed");
    self.query(&self.config.update_url).await
  }

  async fn fetch_regions(&self) -> reqwest::Result<FeatureSet<RegionRecord>> {
    debug!(url = %self.config.full_url, "fetching full feed");
    self.query(&self.config.full_url).await
  }
}
