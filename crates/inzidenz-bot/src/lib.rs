//! Telegram front end for Inzidenz.
//!
//! Exposes the bot configuration, a minimal Telegram Bot API client and the
//! command handler that answers chat messages from the region and
//! subscription stores.

pub mod commands;
pub mod config;
pub mod error;
pub mod telegram;

pub use commands::{Command, Handler};
pub use config::BotConfig;
pub use error::Error;
pub use telegram::TelegramClient;
