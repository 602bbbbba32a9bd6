use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tokio::signal;

use gatebot::cli::{Cli, Commands};
use gatebot::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};
use gatebot::start_webhook_server;
use gatecore::core::{init_logger, AppConfig};
use gatecore::storage::{create_pool, EventLog, PgEventLog, PgProfileStore, ProfileStore};
use gatecore::{AccessGate, CheckRouter};

/// Main entry point
///
/// Parses CLI arguments and dispatches to the subcommand. Running without a
/// subcommand starts the bot.
///
/// # Errors
/// Returns an error if initialization fails (logging, configuration, database, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_logger().map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    let config = AppConfig::from_env()?;

    match cli.command {
        Some(Commands::Migrate) => run_migrate(&config).await,
        Some(Commands::Run) => run_bot(config).await,
        None => {
            log::info!("No command specified, running bot in default mode");
            run_bot(config).await
        }
    }
}

/// Applies migrations and exits. `create_pool` runs them on connect.
async fn run_migrate(config: &AppConfig) -> Result<()> {
    let pool = create_pool(config).await?;
    pool.close().await;
    log::info!("✅ Migrations applied");
    Ok(())
}

async fn run_bot(config: AppConfig) -> Result<()> {
    log::info!("Starting bot...");

    let pool = create_pool(&config).await?;
    let profiles: Arc<dyn ProfileStore> = Arc::new(PgProfileStore::new(pool.clone()));
    let events: Arc<dyn EventLog> = Arc::new(PgEventLog::new(pool));

    let checks = CheckRouter::from_config(&config)?;
    let gate = AccessGate::from_config(Arc::clone(&profiles), events, checks, &config);
    log::info!("Unavailable check policy: {}", config.unavailable_policy);

    let bot = create_bot(&config)?;
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let handler = schema(HandlerDeps::new(gate));
    let mut dispatcher_task = tokio::spawn(async move {
        let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

        Dispatcher::builder(bot, handler)
            .dependencies(DependencyMap::new())
            .build()
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the update listener"),
            )
            .await
    });

    let port = config.port;
    let webhook_path = config.webhook_path.clone();
    let mut webhook_task = tokio::spawn(async move { start_webhook_server(port, &webhook_path, profiles).await });

    log::info!("📡 Ready to receive updates!");

    tokio::select! {
        _ = signal::ctrl_c() => {
            log::info!("Shutting down gracefully...");
        }
        result = &mut dispatcher_task => match result {
            Ok(()) => log::warn!("Dispatcher stopped"),
            Err(e) => log::error!("Dispatcher task failed: {}", e),
        },
        result = &mut webhook_task => match result {
            Ok(Ok(())) => log::warn!("Webhook server stopped"),
            Ok(Err(e)) => log::error!("Webhook server failed: {}", e),
            Err(e) => log::error!("Webhook task failed: {}", e),
        },
    }

    dispatcher_task.abort();
    webhook_task.abort();
    Ok(())
}
