//! Chat command parsing and replies.

use std::{str::FromStr, sync::Arc};

use inzidenz_core::{
  Error, RegionId, Result, SubscriberId,
  store::{RegionStore, SearchIndex, SubscriptionStore},
};
use inzidenz_sync::{Registry, format, search::find_regions};
use strum::EnumString;
use tracing::{error, info};

const NOT_UNDERSTOOD: &str =
  "Sorry, I don't understand.\nTry /help to see the list of available commands.";

const GREETING: &str = "Hi! I'm Corona Inzidenz Updater. I will send you messages about the \
                        current incidence value for cities/areas you are interested in.";

const HELP: &str = "\
You can subscribe to cities or areas for which you will get notifications about the current corona incidence value and more.
You will get updates as soon as they are available. Mostly, the data is updated during the night. It's likely that you will receive messages while you are sleeping ;-). If you are a light sleeper, you may mute the bot.


List of available commands:

/search <name>
Searches for the given city or area.
Example: /search München

/sub <ID>
Subscribes to the given city or area using the specified ID.
Example: /sub 224

/info
Sends you information about the incidence value of the last 7 days per 100.000 inhabitants and other corona values/statistics for your subscribed cities and areas.
Example: /info

/remove <ID>
Removes a city or an area from the subscriptions by using the corresponding ID.
Example: /remove 224

/delete
Deletes all subscriptions.
Example: /delete

/help
Prints this text.
Example: /help

/start
Prints this text.
Example: /start


How to use this bot:
1. Search for a city or an area: /search <name>
2. Subscribe to a city or an area: /sub <ID>
3. You can manually retrieve all information (current corona incidence value and more) by using /info. Otherwise, you will get a message automatically as soon as the data has been updated.";

/// Bot commands, named as typed after the slash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Command {
  Start,
  Help,
  Search,
  Sub,
  Info,
  Remove,
  Delete,
}

impl Command {
  /// Split `/cmd@botname arg1 arg2` into the command and its arguments.
  /// Returns `None` for plain text and unknown commands.
  pub fn parse(text: &str) -> Option<(Self, Vec<&str>)> {
    let mut words = text.split_whitespace();
    let head = words.next()?.strip_prefix('/')?;
    let name = head.split_once('@').map_or(head, |(name, _)| name);
    let command = Self::from_str(name).ok()?;
    Some((command, words.collect()))
  }
}

/// Answers chat messages from the region store and the subscription
/// registry.
pub struct Handler<R, S> {
  registry: Arc<Registry<R, S>>,
}

impl<R, S> Handler<R, S>
where
  R: RegionStore + SearchIndex,
  S: SubscriptionStore,
{
  pub fn new(registry: Arc<Registry<R, S>>) -> Self { Self { registry } }

  /// Build the reply to one message. Store failures become an apology; the
  /// details go to the log.
  pub async fn handle(&self, chat: SubscriberId, text: &str) -> String {
    let Some((command, args)) = Command::parse(text) else {
      return NOT_UNDERSTOOD.to_string();
    };
    info!(subscriber = %chat, ?command, "handling command");

    match self.dispatch(chat, command, &args).await {
      Ok(reply) => reply,
      Err(e) => {
        error!(subscriber = %chat, ?command, error = %e, "command failed");
        "Something went wrong, please try again later.".to_string()
      }
    }
  }

  async fn dispatch(&self, chat: SubscriberId, command: Command, args: &[&str]) -> Result<String> {
    match command {
      Command::Start => Ok(format!("{GREETING}\n\n{HELP}")),
      Command::Help => Ok(HELP.to_string()),
      Command::Search => self.search(args).await,
      Command::Sub => self.subscribe(chat, args).await,
      Command::Info => self.info(chat).await,
      Command::Remove => self.remove(chat, args).await,
      Command::Delete => self.delete(chat).await,
    }
  }

  async fn search(&self, args: &[&str]) -> Result<String> {
    if args.is_empty() {
      return Ok(
        "Please enter a name of a city or an area to search for. E.g.: /search München".into(),
      );
    }

    let query = args.join(" ");
    let mut found = match find_regions(self.registry.regions().as_ref(), &query).await {
      Ok(found) => found,
      Err(Error::InvalidArgument(_)) => Vec::new(),
      Err(e) => return Err(e),
    };
    if found.is_empty() {
      return Ok(format!("No cities or areas found for '{query}'"));
    }

    found.sort_by(|a, b| a.city_area.cmp(&b.city_area));
    let lines: Vec<String> = found.iter().map(format::short_info).collect();
    Ok(format!(
      "Cities and areas found:\n\n{}\n\nPlease use '/sub <ID>' to subscribe to a city or an area.",
      lines.join("\n")
    ))
  }

  async fn subscribe(&self, chat: SubscriberId, args: &[&str]) -> Result<String> {
    if args.is_empty() {
      return Ok("Please enter a ID of a city or an area to subscribe for. E.g.: /sub 224".into());
    }

    let mut reply = String::new();
    for arg in args {
      let added = match RegionId::from_str(arg) {
        Ok(id) => self.registry.subscribe(chat, id).await?,
        Err(_) => false,
      };
      if added {
        reply.push_str(&format!("ID '{arg}' successfully added.\n"));
      } else {
        reply.push_str(&format!(
          "ID '{arg}' doesn't exist. Use the ID given by /search. E.g.: /sub 224\n"
        ));
      }
    }
    Ok(reply)
  }

  async fn remove(&self, chat: SubscriberId, args: &[&str]) -> Result<String> {
    if args.is_empty() {
      return Ok(
        "Please enter a ID of a subscribed city or an area to unsubscribe for. E.g.: /remove 224"
          .into(),
      );
    }

    let mut reply = String::new();
    for arg in args {
      let removed = match RegionId::from_str(arg) {
        Ok(id) => self.registry.unsubscribe(chat, id).await?,
        Err(_) => false,
      };
      if removed {
        reply.push_str(&format!("ID '{arg}' successfully removed.\n"));
      } else {
        reply.push_str(&format!(
          "ID '{arg}' doesn't exist. Use the ID given by /info. E.g.: /remove 224\n"
        ));
      }
    }
    Ok(reply)
  }

  async fn info(&self, chat: SubscriberId) -> Result<String> {
    let records = self.registry.regions_of(chat).await?;
    if records.is_empty() {
      return Ok("No cities or areas are added yet.".into());
    }
    Ok(format::full_info(&records))
  }

  async fn delete(&self, chat: SubscriberId) -> Result<String> {
    if self.registry.delete(chat).await? {
      Ok(
        "Deleted all of your data. You will no longer receive notifications.\nYou can turn the \
         bot back on by sending /start.\n\nStay safe! Bye bye."
          .into(),
      )
    } else {
      Ok("You didn't subscribe to any cities/areas. There is no data to delete.".into())
    }
  }
}
