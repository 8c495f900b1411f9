//! Telegram bot handler tree configuration
//!
//! This module provides the main dispatcher schema for the bot. The
//! handlers are organized in a testable way, allowing integration tests to
//! use the same handler tree as production code.
//!
//! Every inbound text or callback event first ensures a user row exists
//! (lazy creation on first contact). A registry failure turns into one
//! generic failure reply; it never takes down dispatch.

use std::sync::Arc;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use crate::telegram::bot::Command;
use crate::telegram::menu::callback_router::handle_menu_callback;
use crate::telegram::menu::helpers::send_generic_failure;
use crate::telegram::menu::{categories, dashboard, info, main_menu, MenuAction};
use hubcore::storage::db::{self, get_connection, DbPool};
use hubcore::AppResult;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for handlers
pub type HandlerResult = Result<(), HandlerError>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub db_pool: Arc<DbPool>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }
}

/// Telegram user ids are u64 on the wire but the registry key is a signed
/// column; an id outside i64 cannot be stored.
fn sender_id(user: &teloxide::types::User) -> Option<i64> {
    i64::try_from(user.id.0).ok()
}

/// Registry key for a message: the sender's id, falling back to the chat id
/// for senderless messages (channel posts). In groups this keys the same
/// row as the callback path, so the dashboard and the balance button agree.
fn registry_key(from: Option<&teloxide::types::User>, chat_id: ChatId) -> i64 {
    from.and_then(sender_id).unwrap_or(chat_id.0)
}

/// Identity and display metadata extracted from an inbound event
#[derive(Clone)]
pub struct UserInfo {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserInfo {
    /// Extract user info from a Telegram message
    pub fn from_message(msg: &Message) -> Self {
        Self {
            telegram_id: registry_key(msg.from.as_ref(), msg.chat.id),
            username: msg.from.as_ref().and_then(|u| u.username.clone()),
            first_name: msg.from.as_ref().map(|u| u.first_name.clone()),
            last_name: msg.from.as_ref().and_then(|u| u.last_name.clone()),
        }
    }

    /// Extract user info from a callback query's sender. `None` when the
    /// sender's id does not fit the registry key.
    pub fn from_user(user: &teloxide::types::User) -> Option<Self> {
        Some(Self {
            telegram_id: sender_id(user)?,
            username: user.username.clone(),
            first_name: Some(user.first_name.clone()),
            last_name: user.last_name.clone(),
        })
    }
}

/// Result of ensure_user_exists operation
pub enum UserCreationResult {
    /// User already existed
    Existed,
    /// User was newly created
    Created,
    /// Registry unavailable
    DbError,
}

fn ensure_user_row(db_pool: &Arc<DbPool>, user: &UserInfo) -> AppResult<(db::User, bool)> {
    let conn = get_connection(db_pool)?;
    Ok(db::ensure_user(
        &conn,
        user.telegram_id,
        user.username.clone(),
        user.first_name.clone(),
        user.last_name.clone(),
    )?)
}

/// Ensures a user row exists in the database, creating it if needed.
///
/// Display fields are only stored by the call that creates the row;
/// repeated contacts never refresh them.
pub fn ensure_user_exists(db_pool: &Arc<DbPool>, user: &UserInfo) -> UserCreationResult {
    match ensure_user_row(db_pool, user) {
        Ok((_, true)) => {
            log::info!(
                "✅ New user registered: {} (ID: {})",
                user.username.as_deref().unwrap_or("<no username>"),
                user.telegram_id
            );
            UserCreationResult::Created
        }
        Ok((_, false)) => UserCreationResult::Existed,
        Err(e) => {
            log::error!("User registry unavailable for {}: {}", user.telegram_id, e);
            UserCreationResult::DbError
        }
    }
}

/// Creates the main dispatcher schema for the bot.
///
/// The same schema is used in production and in integration tests.
/// Branch order matters: commands first so `/start` never reaches the
/// free-text matcher.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_commands = deps.clone();
    let deps_text = deps.clone();

    dptree::entry()
        .branch(command_handler(deps_commands))
        .branch(text_handler(deps_text))
        .branch(callback_handler(deps))
}

/// Handler for the registered commands (/start, /profile, /help)
fn command_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter_command::<Command>()
        .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
            let deps = deps.clone();
            async move {
                let user = UserInfo::from_message(&msg);
                if matches!(ensure_user_exists(&deps.db_pool, &user), UserCreationResult::DbError) {
                    send_generic_failure(&bot, msg.chat.id).await?;
                    return Ok(());
                }

                match cmd {
                    Command::Start => main_menu::send_welcome(&bot, msg.chat.id).await?,
                    Command::Profile => info::send_profile_panel(&bot, msg.chat.id).await?,
                    Command::Help => info::send_help_panel(&bot, msg.chat.id).await?,
                }
                Ok(())
            }
        })
}

/// Handler for free text: exact-match dispatch over the menu labels.
///
/// Total over all texts: six labels map to their panels, everything else
/// (including unknown /commands, which fall through the command filter)
/// gets the fallback plus the menu. Non-text messages skip this branch and
/// land in the dispatcher's default handler.
fn text_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter_map(|msg: Message| msg.text().map(ToOwned::to_owned))
        .endpoint(move |bot: Bot, msg: Message, text: String| {
            let deps = deps.clone();
            async move {
                let user = UserInfo::from_message(&msg);
                if matches!(ensure_user_exists(&deps.db_pool, &user), UserCreationResult::DbError) {
                    send_generic_failure(&bot, msg.chat.id).await?;
                    return Ok(());
                }

                match MenuAction::from_label(&text) {
                    Some(MenuAction::BrowseFreelancers) => info::send_browse_panel(&bot, msg.chat.id).await?,
                    Some(MenuAction::PostJob) => categories::send_post_job_prompt(&bot, msg.chat.id).await?,
                    Some(MenuAction::Categories) => categories::send_category_picker(&bot, msg.chat.id).await?,
                    Some(MenuAction::UpgradeToPro) => crate::telegram::menu::pro::send_pro_panel(&bot, msg.chat.id).await?,
                    Some(MenuAction::MyDashboard) => {
                        // Storage failures degrade to the generic failure
                        // reply; Telegram failures propagate as usual.
                        if let Err(e) = dashboard::send_dashboard(&bot, msg.chat.id, user.telegram_id, &deps.db_pool).await {
                            if e.is_storage() {
                                log::error!("Balance lookup failed for {}: {}", user.telegram_id, e);
                                send_generic_failure(&bot, msg.chat.id).await?;
                            } else {
                                return Err(e.into());
                            }
                        }
                    }
                    Some(MenuAction::HelpCenter) => info::send_help_panel(&bot, msg.chat.id).await?,
                    None => main_menu::send_fallback(&bot, msg.chat.id).await?,
                }
                Ok(())
            }
        })
}

/// Handler for callback queries (inline button presses)
fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            handle_menu_callback(bot, q, Arc::clone(&deps.db_pool)).await?;
            Ok(())
        }
    })
}
