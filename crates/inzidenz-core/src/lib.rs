//! Core types and trait definitions for the Inzidenz updater.
//!
//! This crate has no HTTP or database dependencies.
//! Storage backends, the feed client and the bot all depend on it.

// Traits return `impl Future + Send` explicitly; silence the advisory lint.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod feed;
pub mod region;
pub mod search;
pub mod store;
pub mod subscription;

pub use error::{BoxError, Error, Result};
pub use region::{LastUpdate, RegionId, RegionRecord};
pub use subscription::SubscriberId;
