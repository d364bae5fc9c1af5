//! Error types for the Telegram transport.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The Bot API answered with `ok: false`.
  #[error("telegram api error: {0}")]
  Api(String),

  #[error(transparent)]
  Core(#[from] inzidenz_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
