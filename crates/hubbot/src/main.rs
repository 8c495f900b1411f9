use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::prelude::*;
use tokio::time::sleep;

use freelancehub::cli::{Cli, Commands};
use freelancehub::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};
use hubcore::storage::db;
use hubcore::{categories, config, create_pool, get_connection, init_logger, log_config_summary};

/// Main entry point for the FreelanceHub bot
///
/// Parses CLI arguments and dispatches to the appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, database, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Set up a global panic handler so a panicking handler is logged and
    // the dispatcher restart loop can take over instead of a silent exit.
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    // Load environment variables from .env before any config static is read
    let _ = dotenv();

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run { webhook }) => {
            log::info!("Running bot (webhook: {})", webhook);
            run_bot(webhook).await
        }
        Some(Commands::Users { limit }) => run_users(limit),
        None => {
            log::info!("No command specified, running bot in polling mode");
            run_bot(false).await
        }
    }
}

/// Print registered users from the configured database.
fn run_users(limit: Option<usize>) -> Result<()> {
    let pool = create_pool(&config::DATABASE_PATH)?;
    let conn = get_connection(&pool)?;
    let users = db::get_all_users(&conn)?;

    println!("{} registered user(s)", users.len());
    let shown = limit.unwrap_or(users.len());
    for user in users.iter().take(shown) {
        println!(
            "{:<12} {:<20} {:<10} {:>12} {}",
            user.telegram_id,
            user.username.as_deref().unwrap_or("-"),
            user.account_type,
            format!("{:.2}", user.balance),
            user.created_at
        );
    }
    Ok(())
}

/// Validate the static tables the dispatcher matches against.
fn validate_static_tables() -> Result<()> {
    categories::validate().map_err(|e| anyhow::anyhow!("Invalid category table: {}", e))?;
    freelancehub::telegram::menu::validate_labels().map_err(|e| anyhow::anyhow!("Invalid menu labels: {}", e))?;
    Ok(())
}

async fn run_bot(use_webhook: bool) -> Result<()> {
    log::info!("Starting FreelanceHub bot...");
    log_config_summary();
    validate_static_tables()?;

    let bot = create_bot()?;

    // Retry get_me while the Bot API is still warming up
    let bot_info = {
        let mut attempt = 0;
        loop {
            match bot.get_me().await {
                Ok(info) => break info,
                Err(e) => {
                    attempt += 1;
                    if attempt >= config::retry::MAX_STARTUP_RETRIES {
                        return Err(anyhow::anyhow!(
                            "Failed to connect to Bot API after {} attempts: {}",
                            attempt,
                            e
                        ));
                    }
                    log::warn!(
                        "Bot API not ready (attempt {}/{}): {}. Retrying...",
                        attempt,
                        config::retry::MAX_STARTUP_RETRIES,
                        e
                    );
                    sleep(config::retry::startup_delay()).await;
                }
            }
        }
    };
    log::info!("Bot username: {:?}, Bot ID: {}", bot_info.username, bot_info.id);

    setup_bot_commands(&bot).await?;

    // Create database connection pool
    let db_pool = Arc::new(
        create_pool(&config::DATABASE_PATH).map_err(|e| anyhow::anyhow!("Failed to create database pool: {}", e))?,
    );

    match get_connection(&db_pool).map_err(anyhow::Error::from).and_then(|conn| {
        db::count_users(&conn).map_err(anyhow::Error::from)
    }) {
        Ok(count) => log::info!("Registered users: {}", count),
        Err(e) => log::warn!("Could not count users at startup: {}", e),
    }

    let handler = schema(HandlerDeps::new(Arc::clone(&db_pool)));

    let webhook_url = if use_webhook { config::WEBHOOK_URL.clone() } else { None };

    if let Some(url) = webhook_url {
        run_webhook(bot, handler, &url).await
    } else {
        run_polling(bot, handler).await;
        Ok(())
    }
}

/// Webhook mode: Telegram pushes updates to an embedded axum listener.
async fn run_webhook(
    bot: Bot,
    handler: teloxide::dispatching::UpdateHandler<freelancehub::HandlerError>,
    webhook_url: &str,
) -> Result<()> {
    use teloxide::update_listeners::webhooks;

    let port = *config::network::WEBHOOK_PORT;
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let url = url::Url::parse(webhook_url).map_err(|e| anyhow::anyhow!("Invalid WEBHOOK_URL: {}", e))?;

    log::info!("Starting bot in webhook mode at {} (listening on port {})", url, port);
    let listener = webhooks::axum(bot.clone(), webhooks::Options::new(addr, url))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to set up webhook listener: {}", e))?;

    Dispatcher::builder(bot, handler)
        .default_handler(|upd| async move {
            log::warn!("Unhandled update kind: {:?}", upd.kind);
        })
        .dependencies(DependencyMap::new())
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    Ok(())
}

/// Long polling mode (the default), with a restart loop: a panicking
/// dispatcher is isolated in its own task and reconnects with exponential
/// backoff up to the retry cap.
async fn run_polling(bot: Bot, handler: teloxide::dispatching::UpdateHandler<freelancehub::HandlerError>) {
    log::info!("Starting bot in long polling mode");
    log::info!("📡 Ready to receive updates!");

    let mut retry_count = 0;
    let max_retries = config::retry::MAX_DISPATCHER_RETRIES;

    loop {
        let bot_clone = bot.clone();
        let handler_clone = handler.clone();

        // A separate task isolates dispatcher panics behind the JoinHandle
        let handle = tokio::spawn(async move {
            use teloxide::update_listeners::Polling;

            let listener = Polling::builder(bot_clone.clone()).drop_pending_updates().build();

            Dispatcher::builder(bot_clone, handler_clone)
                .default_handler(|upd| async move {
                    log::warn!("Unhandled update kind: {:?}", upd.kind);
                })
                .dependencies(DependencyMap::new())
                .enable_ctrlc_handler()
                .build()
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await
        });

        match handle.await {
            Ok(()) => {
                log::info!("Dispatcher shutdown gracefully");
                break;
            }
            Err(join_err) => {
                if join_err.is_panic() {
                    log::error!("Dispatcher panicked: {}", join_err);

                    if retry_count < max_retries {
                        retry_count += 1;
                        log::info!(
                            "Retrying dispatcher connection after panic (attempt {}/{})...",
                            retry_count,
                            max_retries
                        );
                        sleep(config::retry::exponential_backoff(retry_count)).await;
                    } else {
                        log::error!("Max retries reached after panic. Exiting...");
                        break;
                    }
                } else {
                    log::warn!("Dispatcher task was cancelled: {}", join_err);
                    break;
                }
            }
        }
    }
}
