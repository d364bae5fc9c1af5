//! Feed payloads and the [`FeedSource`] trait.
//!
//! Both upstream endpoints answer with a feature-service query result:
//! `{"features": [{"attributes": {...}}, ...]}`. A response without the
//! `features` list (e.g. a service error object) is malformed.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  region::{LastUpdateEntry, RegionRecord},
};

/// Top-level query response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSet<A> {
  pub features: Option<Vec<Feature<A>>>,
}

/// One feature; only its attributes are of interest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature<A> {
  pub attributes: Option<A>,
}

impl<A> FeatureSet<A> {
  pub fn new(attributes: impl IntoIterator<Item = A>) -> Self {
    Self {
      features: Some(
        attributes
          .into_iter()
          .map(|a| Feature { attributes: Some(a) })
          .collect(),
      ),
    }
  }

  /// Unwrap the attribute objects, skipping features that carry none.
  ///
  /// Fails with [`Error::MalformedFeed`] when `features` is missing.
  pub fn into_attributes(self) -> Result<Vec<A>> {
    let features = self
      .features
      .ok_or_else(|| Error::MalformedFeed("response has no `features` list".into()))?;
    Ok(features.into_iter().filter_map(|f| f.attributes).collect())
  }
}

/// Abstraction over the remote data source.
///
/// The production implementation talks HTTP; tests substitute canned
/// payloads.
pub trait FeedSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch the staleness feed: id and `last_update` per region.
  fn fetch_last_updates(
    &self,
  ) -> impl Future<Output = Result<FeatureSet<LastUpdateEntry>, Self::Error>> + Send + '_;

  /// Fetch the full feed: every region's complete attribute set.
  fn fetch_regions(
    &self,
  ) -> impl Future<Output = Result<FeatureSet<RegionRecord>, Self::Error>> + Send + '_;
}
