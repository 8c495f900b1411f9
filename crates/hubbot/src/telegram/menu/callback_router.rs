//! Callback query dispatch
//!
//! Callback identifiers are `prefix_payload` strings. The category grid
//! carries the category slug as payload; the remaining identifiers match
//! exactly. Unrecognized identifiers are answered (to clear the client's
//! spinner), logged, and otherwise ignored.

use std::sync::Arc;

use teloxide::prelude::*;

use super::dashboard::{fetch_balance, format_balance};
use super::helpers::{edit_or_send, send_generic_failure};
use super::{categories, main_menu};
use crate::telegram::handlers::{ensure_user_exists, UserCreationResult, UserInfo};
use hubcore::storage::db::DbPool;

/// Handles callback queries from the inline keyboards.
pub async fn handle_menu_callback(bot: Bot, q: CallbackQuery, db_pool: Arc<DbPool>) -> ResponseResult<()> {
    // Answer first in all cases so the client stops showing a spinner.
    let _ = bot.answer_callback_query(q.id.clone()).await;

    let chat_id = q.message.as_ref().map(|m| m.chat().id);
    let Some(user) = UserInfo::from_user(&q.from) else {
        log::warn!("Callback {} sender id {} does not fit the registry key", q.id, q.from.id);
        return Ok(());
    };

    // A button press is first contact too when the user's chat history
    // predates the bot's database.
    if matches!(ensure_user_exists(&db_pool, &user), UserCreationResult::DbError) {
        if let Some(chat_id) = chat_id {
            send_generic_failure(&bot, chat_id).await?;
        }
        return Ok(());
    }

    let Some(data) = q.data.clone() else {
        log::warn!("Callback {} carried no data", q.id);
        return Ok(());
    };

    if let Some(slug) = data.strip_prefix("category_") {
        edit_or_send(&bot, &q, categories::selection_text(slug), None).await?;
    } else {
        match data.as_str() {
            "pro_subscribe" => {
                edit_or_send(&bot, &q, "⭐ PRO subscription - Payment system coming soon!".to_string(), None).await?;
            }
            "main_menu" => {
                edit_or_send(&bot, &q, "Returning to main menu...".to_string(), None).await?;
                if let Some(chat_id) = chat_id {
                    main_menu::send_main_menu(&bot, chat_id).await?;
                }
            }
            "create_profile" => {
                edit_or_send(&bot, &q, "👤 Profile creation coming soon!".to_string(), None).await?;
            }
            "check_balance" => {
                match fetch_balance(&db_pool, user.telegram_id) {
                    Ok(balance) => {
                        let text = format!("💰 Your balance: {}", format_balance(balance));
                        edit_or_send(&bot, &q, text, None).await?;
                    }
                    Err(e) => {
                        log::error!("Balance lookup failed for {}: {}", user.telegram_id, e);
                        if let Some(chat_id) = chat_id {
                            send_generic_failure(&bot, chat_id).await?;
                        }
                    }
                }
            }
            other => {
                // No response is defined for unknown identifiers; answering
                // above already cleared the spinner.
                log::warn!("Unrecognized callback id '{}' from user {}", other, user.telegram_id);
            }
        }
    }

    Ok(())
}
