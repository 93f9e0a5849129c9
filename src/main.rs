//! Process bootstrap: configuration, storage, background sweeps, dispatcher.

use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use portero::adapters::telegram::schema;
use portero::adapters::{SqliteSubscriptionStore, TelegramChannelGateway};
use portero::application::{AppState, ExpirationSweeper, LifecycleEngine, ReminderService};
use portero::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let pool = SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(config.database.connect_options()?)
        .await?;
    if config.database.run_migrations {
        SqliteSubscriptionStore::migrate(&pool).await?;
    }

    let store = Arc::new(SqliteSubscriptionStore::new(pool));
    let engine = Arc::new(LifecycleEngine::new(store));

    let bot = Bot::new(config.bot.token.clone());
    let channels = config.bot.channels()?;
    info!(channels = channels.len(), "starting portero");
    let gateway = Arc::new(TelegramChannelGateway::new(bot.clone(), channels));

    let scheduler = config.scheduler.clone();
    let state = AppState {
        engine: engine.clone(),
        gateway: gateway.clone(),
        config: Arc::new(config),
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sweeper = ExpirationSweeper::new(
        engine.clone(),
        gateway.clone(),
        scheduler.sweep_interval(),
    );
    let sweep_rx = shutdown_rx.clone();
    let sweep_handle = tokio::spawn(async move { sweeper.run(sweep_rx).await });

    let reminder = ReminderService::new(engine, gateway, scheduler.reminder_hour_utc);
    let remind_rx = shutdown_rx;
    let remind_handle = tokio::spawn(async move { reminder.run(remind_rx).await });

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .default_handler(|upd| async move {
            tracing::debug!(?upd, "unhandled update");
        })
        .error_handler(LoggingErrorHandler::with_custom_text("dispatcher error"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    let _ = shutdown_tx.send(true);
    let _ = sweep_handle.await;
    let _ = remind_handle.await;

    Ok(())
}
