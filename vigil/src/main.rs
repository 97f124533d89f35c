mod cli;
mod config;
mod error;
mod logging;
mod monitor;
mod notification;
mod store;

pub use error::{Error, Result};

use std::process;
use std::sync::Arc;

use clap::Parser;
use platforms_probe::{Platform, default_registry};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::cli::{Args, Commands};
use crate::config::AppConfig;
use crate::monitor::{PollingScheduler, SchedulerConfig};
use crate::notification::{NotificationChannel, WebhookChannel};
use crate::store::{AccountKey, JsonFileStore, TrackedAccount, TrackingStore};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("Application error: {}", e);
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    logging::init_logging(args.verbose, args.quiet)?;
    dotenvy::dotenv().ok();

    let config = AppConfig::load(args.config.as_deref())?;
    let store = Arc::new(JsonFileStore::new(config.store.path.clone()));

    match args.command {
        Commands::Run { once } => run_scheduler(config, store, once).await,
        Commands::Add {
            platform,
            username,
            display_name,
        } => add_account(store, &platform, &username, display_name).await,
        Commands::Remove { platform, username } => {
            remove_account(store, &platform, &username).await
        }
        Commands::List => list_accounts(store).await,
        Commands::Test => test_notification(config).await,
    }
}

fn parse_platform(input: &str) -> Result<Platform> {
    input.parse::<Platform>().map_err(Error::validation)
}

fn webhook_channel(config: &AppConfig) -> Arc<dyn NotificationChannel> {
    let channel = WebhookChannel::new(config.notification.clone());
    if !channel.is_enabled() {
        warn!("webhook notifications disabled, live transitions will only be logged");
    }
    Arc::new(channel)
}

async fn run_scheduler(config: AppConfig, store: Arc<JsonFileStore>, once: bool) -> Result<()> {
    let registry = Arc::new(default_registry(config.checker_settings()));
    let channel = webhook_channel(&config);
    let scheduler = Arc::new(PollingScheduler::new(
        store,
        registry,
        channel,
        SchedulerConfig {
            poll_interval: config.poll_interval(),
        },
    ));

    if once {
        scheduler.run_cycle().await;
        return Ok(());
    }

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
                cancel.cancel();
            }
        });
    }

    scheduler.run(cancel).await;
    Ok(())
}

async fn add_account(
    store: Arc<JsonFileStore>,
    platform: &str,
    username: &str,
    display_name: Option<String>,
) -> Result<()> {
    let platform = parse_platform(platform)?;
    let account = TrackedAccount::new(platform, username, display_name);
    let key = account.key();

    if store.get(&key).await?.is_some() {
        return Err(Error::validation(format!("already tracking {key}")));
    }

    store.put(account).await?;
    println!("Now tracking {key}");
    Ok(())
}

async fn remove_account(store: Arc<JsonFileStore>, platform: &str, username: &str) -> Result<()> {
    let platform = parse_platform(platform)?;
    let key = AccountKey::new(platform, username);

    if store.delete(&key).await? {
        println!("Stopped tracking {key}");
    } else {
        println!("{key} was not tracked");
    }
    Ok(())
}

async fn list_accounts(store: Arc<JsonFileStore>) -> Result<()> {
    let accounts = store.list().await?;
    if accounts.is_empty() {
        println!("No tracked accounts");
        return Ok(());
    }

    for account in accounts {
        let resolved = account
            .resolved_id
            .as_deref()
            .map(|id| format!(" (id: {id})"))
            .unwrap_or_default();
        println!(
            "{:8} {} [{}]{}",
            account.platform.to_string(),
            account.username,
            account.display_name,
            resolved
        );
    }
    Ok(())
}

async fn test_notification(config: AppConfig) -> Result<()> {
    let channel = WebhookChannel::new(config.notification.clone());
    if !channel.is_enabled() {
        return Err(Error::config(
            "webhook notifications are not configured (set [notification] or VIGIL_WEBHOOK_URL)",
        ));
    }

    channel.test().await?;
    println!("Test notification sent");
    Ok(())
}
