//! FreelanceHub - Telegram bot for the FreelanceHub marketplace
//!
//! This library carries the Telegram front end: the dispatcher schema,
//! command/text/callback handlers and the menu panels. Everything that does
//! not touch Telegram (user registry, config, categories) lives in
//! `hubcore`.
//!
//! # Module Structure
//!
//! - `cli`: Command-line argument parsing
//! - `telegram`: Bot setup, dispatcher schema and menu handlers

pub mod cli;
pub mod telegram;

// Re-export commonly used types for convenience
pub use telegram::{create_bot, schema, Command, HandlerDeps, HandlerError};
