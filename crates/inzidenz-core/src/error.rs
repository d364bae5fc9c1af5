//! Error types for `inzidenz-core`.

use thiserror::Error;

use crate::region::RegionId;

/// A type-erased error from a storage backend, feed source or transport.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("region not found: {0}")]
  NotFound(RegionId),

  #[error("feed fetch failed: {0}")]
  FetchFailed(#[source] BoxError),

  /// The feed answered, but without the expected top-level field.
  #[error("malformed feed: {0}")]
  MalformedFeed(String),

  #[error("store error: {0}")]
  Store(#[source] BoxError),
}

impl Error {
  /// Box a backend error into [`Error::Store`].
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }

  /// Box a feed source error into [`Error::FetchFailed`].
  pub fn fetch(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::FetchFailed(Box::new(e))
  }

  /// Whether this error ended a fetch cycle (and is retried on the next tick).
  pub fn is_fetch_failure(&self) -> bool {
    matches!(self, Self::FetchFailed(_) | Self::MalformedFeed(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
