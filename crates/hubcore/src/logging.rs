//! Logging initialization and startup diagnostics
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - A startup summary of the resolved configuration

use anyhow::Result;
use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;

use crate::categories;
use crate::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the log file or install the logger
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the resolved configuration at application startup.
///
/// Tokens are never logged, only whether one is present.
pub fn log_config_summary() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("🤖 FreelanceHub configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("Database path: {}", *config::DATABASE_PATH);
    log::info!("Log file: {}", *config::LOG_FILE_PATH);
    log::info!("Bot token configured: {}", !config::BOT_TOKEN.is_empty());
    match config::WEBHOOK_URL.as_deref() {
        Some(url) => log::info!("Webhook URL: {} (port {})", url, *config::network::WEBHOOK_PORT),
        None => log::info!("Webhook URL: not set (long polling)"),
    }
    if let Some(api_url) = config::BOT_API_URL.as_deref() {
        log::info!("Custom Bot API URL: {}", api_url);
    }
    log::info!("Admins configured: {}", config::admin::ADMIN_IDS.len());
    log::info!("Categories: {}", categories::all().len());
    log::info!(
        "Commission rate: {:.0}%, PRO price: {} {}",
        *config::marketplace::COMMISSION_RATE * 100.0,
        *config::marketplace::PRO_PRICE_USDT,
        config::marketplace::CURRENCY
    );
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}
