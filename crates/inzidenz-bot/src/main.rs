//! inzidenz binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the region
//! and subscription databases and then either runs the bot service or answers
//! a one-off command against the local data.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use inzidenz_bot::{BotConfig, Handler, TelegramClient};
use inzidenz_core::RegionId;
use inzidenz_store_sqlite::{SqliteRegionStore, SqliteSubscriptionStore};
use inzidenz_sync::{
  ArcGisFeed, Notifier, Registry, Updater, format, schedule,
  search::{find_regions, region},
};
use tokio::sync::mpsc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Corona incidence updater bot")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Hours between update checks; overrides the configuration file.
  #[arg(long, env = "INZIDENZ_UPDATE_INTERVAL_HOURS")]
  update_interval_hours: Option<u64>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Run the update scheduler, notifier and bot (default).
  Run,
  /// Check the feed once, refreshing if needed, and exit.
  Check,
  /// Search the local region data by city or area name.
  Search {
    #[arg(required = true)]
    name: Vec<String>,
  },
  /// Print the stored record of one region.
  Show { id: RegionId },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("INZIDENZ"))
    .build()
    .context("failed to read config file")?;

  let mut bot_cfg: BotConfig = settings
    .try_deserialize()
    .context("failed to deserialise BotConfig")?;
  if let Some(hours) = cli.update_interval_hours {
    bot_cfg.update_interval_hours = hours;
  }
  bot_cfg.validate().context("invalid configuration")?;

  std::fs::create_dir_all(&bot_cfg.database_directory).with_context(|| {
    format!("failed to create {:?}", bot_cfg.database_directory)
  })?;

  let regions_path = bot_cfg.regions_db();
  let regions = SqliteRegionStore::open(&regions_path)
    .await
    .with_context(|| format!("failed to open region store at {regions_path:?}"))?;
  let regions = Arc::new(regions);

  match cli.command.unwrap_or(Command::Run) {
    Command::Run => run(bot_cfg, regions).await,
    Command::Check => {
      let (tx, _rx) = mpsc::channel(1);
      let feed = ArcGisFeed::new(bot_cfg.feed()).context("failed to build HTTP client")?;
      let outcome = Updater::new(regions, feed, tx)
        .check_update()
        .await
        .context("update check failed")?;
      println!("{outcome:?}");
      Ok(())
    }
    Command::Search { name } => {
      let query = name.join(" ");
      let mut found = find_regions(regions.as_ref(), &query).await?;
      found.sort_by(|a, b| a.city_area.cmp(&b.city_area));
      for record in &found {
        println!("{}", format::short_info(record));
      }
      Ok(())
    }
    Command::Show { id } => {
      let record = region(regions.as_ref(), id).await?;
      println!("{}", format::full_info(&[record]));
      Ok(())
    }
  }
}

/// Wire the scheduler, notifier and bot together and run until Ctrl-C.
async fn run(cfg: BotConfig, regions: Arc<SqliteRegionStore>) -> anyhow::Result<()> {
  let subscriptions_path = cfg.subscriptions_db();
  let subscriptions = SqliteSubscriptionStore::open(&subscriptions_path)
    .await
    .with_context(|| format!("failed to open subscription store at {subscriptions_path:?}"))?;

  let token = cfg.token().context("invalid configuration")?;
  let telegram = Arc::new(
    TelegramClient::new(&cfg.telegram_api_url, token, cfg.poll_timeout_secs)
      .context("failed to build Telegram client")?,
  );
  let feed = ArcGisFeed::new(cfg.feed()).context("failed to build HTTP client")?;

  let (tx, rx) = mpsc::channel(16);
  let updater = Arc::new(Updater::new(regions.clone(), feed, tx));
  let registry = Arc::new(Registry::new(regions, subscriptions));
  let notifier = Notifier::new(registry.clone(), telegram.clone());
  let handler = Handler::new(registry);

  let scheduler = tokio::spawn(schedule::run(updater, cfg.update_interval()));
  let notifications = tokio::spawn(notifier.run(rx));
  let bot = tokio::spawn(async move { telegram.poll(&handler).await });

  info!(interval_hours = cfg.update_interval_hours, "inzidenz started");
  tokio::signal::ctrl_c()
    .await
    .context("failed to listen for shutdown signal")?;
  info!("shutting down");

  scheduler.abort();
  bot.abort();
  notifications.abort();
  Ok(())
}
