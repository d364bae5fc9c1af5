//! SQLite backend for the Inzidenz region and subscription stores.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Region data and subscriptions live in
//! separate databases, so their keys never collide.

mod encode;
mod region;
mod schema;
mod subscription;

pub mod error;

pub use error::{Error, Result};
pub use region::SqliteRegionStore;
pub use subscription::SqliteSubscriptionStore;

#[cfg(test)]
mod tests;
