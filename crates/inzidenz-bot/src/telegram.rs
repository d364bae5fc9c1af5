//! Minimal Telegram Bot API client: long polling and plain-text messages.

use std::time::Duration;

use inzidenz_core::{
  SubscriberId,
  store::{RegionStore, SearchIndex, SubscriptionStore},
};
use inzidenz_sync::MessageSender;
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use crate::{
  Handler,
  error::{Error, Result},
};

/// Longest text the Bot API accepts in one message, in characters.
pub const MAX_MESSAGE_LEN: usize = 4096;

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
  ok:          bool,
  result:      Option<T>,
  #[serde(default)]
  description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
  pub update_id: i64,
  #[serde(default)]
  pub message:   Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
  pub message_id: i64,
  pub chat:       Chat,
  #[serde(default)]
  pub text:       Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
  pub id: i64,
}

#[derive(Serialize)]
struct GetUpdates {
  #[serde(skip_serializing_if = "Option::is_none")]
  offset:          Option<i64>,
  timeout:         u64,
  allowed_updates: &'static [&'static str],
}

#[derive(Serialize)]
struct SendMessage<'a> {
  chat_id: i64,
  text:    &'a str,
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Async client for one bot token.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct TelegramClient {
  client:       Client,
  base_url:     String,
  poll_timeout: u64,
}

impl TelegramClient {
  /// `poll_timeout` is the long-poll wait in seconds; the HTTP timeout is
  /// set somewhat above it.
  pub fn new(api_url: &str, token: &str, poll_timeout: u64) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(poll_timeout + 30))
      .build()?;
    Ok(Self {
      client,
      base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
      poll_timeout,
    })
  }

  fn url(&self, method: &str) -> String { format!("{}/{}", self.base_url, method) }

  async fn call<B, T>(&self, method: &str, body: &B) -> Result<T>
  where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
  {
    let resp: ApiResponse<T> = self
      .client
      .post(self.url(method))
      .json(body)
      .send()
      .await?
      .json()
      .await?;

    match resp {
      ApiResponse { ok: true, result: Some(result), .. } => Ok(result),
      ApiResponse { description, .. } => Err(Error::Api(
        description.unwrap_or_else(|| format!("{method} returned no result")),
      )),
    }
  }

  /// `getUpdates`: wait for messages after `offset`. Edited messages and
  /// other update kinds are not requested.
  pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>> {
    self
      .call("getUpdates", &GetUpdates {
        offset,
        timeout: self.poll_timeout,
        allowed_updates: &["message"],
      })
      .await
  }

  /// `sendMessage`, split into several messages if `text` is too long.
  pub async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
    for chunk in split_message(text, MAX_MESSAGE_LEN) {
      let _: serde_json::Value = self
        .call("sendMessage", &SendMessage { chat_id, text: &chunk })
        .await?;
    }
    Ok(())
  }

  /// Answer incoming commands until the task is cancelled.
  ///
  /// Failed polls are logged and retried after a short pause.
  pub async fn poll<R, S>(&self, handler: &Handler<R, S>)
  where
    R: RegionStore + SearchIndex,
    S: SubscriptionStore,
  {
    info!("telegram long polling started");
    let mut offset = None;

    loop {
      let updates = match self.get_updates(offset).await {
        Ok(updates) => updates,
        Err(e) => {
          warn!(error = %e, "getUpdates failed");
          tokio::time::sleep(Duration::from_secs(5)).await;
          continue;
        }
      };

      for update in updates {
        offset = Some(update.update_id + 1);
        let Some(message) = update.message else { continue };
        let Some(text) = message.text else { continue };

        let chat = SubscriberId(message.chat.id);
        debug!(subscriber = %chat, "incoming message");
        let reply = handler.handle(chat, &text).await;
        if let Err(e) = self.send_text(chat.0, &reply).await {
          warn!(subscriber = %chat, error = %e, "failed to send reply");
        }
      }
    }
  }
}

impl MessageSender for TelegramClient {
  type Error = Error;

  async fn send_message<'a>(&'a self, subscriber: SubscriberId, text: &'a str) -> Result<()> {
    self.send_text(subscriber.0, text).await
  }
}

/// Split `text` into chunks of at most `max` characters, breaking at line
/// ends where possible.
pub fn split_message(text: &str, max: usize) -> Vec<String> {
  let mut chunks = Vec::new();
  let mut current = String::new();
  let mut len = 0;

  for line in text.split_inclusive('\n') {
    let line_len = line.chars().count();
    if len + line_len <= max {
      current.push_str(line);
      len += line_len;
      continue;
    }

    if !current.is_empty() {
      chunks.push(std::mem::take(&mut current));
      len = 0;
    }

    if line_len <= max {
      current.push_str(line);
      len = line_len;
    } else {
      let chars: Vec<char> = line.chars().collect();
      for piece in chars.chunks(max) {
        chunks.push(piece.iter().collect());
      }
    }
  }

  if !current.is_empty() {
    chunks.push(current);
  }
  chunks
}
