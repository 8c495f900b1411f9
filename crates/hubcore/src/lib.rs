//! hubcore - Core library for the FreelanceHub marketplace bot
//!
//! This library provides everything the bot needs that does not talk to
//! Telegram: the user registry over SQLite, configuration, the static
//! category table, and logging setup.
//!
//! # Module Structure
//!
//! - `config`: Environment-backed configuration statics
//! - `error`: Centralized `AppError` type
//! - `types`: Domain enums (`AccountType`)
//! - `categories`: Static category table and slug helpers
//! - `logging`: Logger initialization and the startup summary
//! - `storage`: User registry over a pooled SQLite database

pub mod categories;
pub mod config;
pub mod error;
pub mod logging;
pub mod storage;
pub mod types;

// Re-export commonly used types for convenience
pub use categories::{humanize_slug, Category};
pub use error::{AppError, AppResult};
pub use logging::{init_logger, log_config_summary};
pub use storage::{create_pool, get_connection, DbConnection, DbPool};
pub use types::AccountType;
