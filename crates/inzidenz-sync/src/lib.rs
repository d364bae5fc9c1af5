//! Update detection, refresh and notification for Inzidenz.
//!
//! The pieces are wired together by the binary:
//!
//! ```text
//! schedule::run ─▶ Updater::check_update ─▶ Updater::refresh
//!                                              │ RefreshEvent (mpsc)
//!                                              ▼
//!                          Notifier ─▶ Registry + format ─▶ MessageSender
//! ```
//!
//! Stores and feed sources are injected, so every component can be exercised
//! against in-memory backends.

pub mod feed;
pub mod format;
pub mod notify;
pub mod pipeline;
pub mod registry;
pub mod schedule;
pub mod search;

pub use feed::{ArcGisFeed, FeedConfig};
pub use notify::{MessageSender, Notifier};
pub use pipeline::{CheckOutcome, RefreshEvent, RefreshReport, Updater};
pub use registry::Registry;
