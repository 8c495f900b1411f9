//! Shared reply plumbing for the menu handlers

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, MaybeInaccessibleMessage};

/// The single user-visible failure reply. Every storage error on the
/// dispatch path collapses to this; details go to the log only.
pub const GENERIC_FAILURE: &str = "⚠️ Something went wrong. Please try again later.";

pub async fn send_generic_failure(bot: &Bot, chat_id: ChatId) -> ResponseResult<()> {
    bot.send_message(chat_id, GENERIC_FAILURE).await?;
    Ok(())
}

/// Edit the message the pressed button was attached to. Falls back to a
/// plain send when the message is inaccessible (too old, or deleted); with
/// no message at all the response is dropped after logging.
pub async fn edit_or_send(
    bot: &Bot,
    q: &CallbackQuery,
    text: String,
    keyboard: Option<InlineKeyboardMarkup>,
) -> ResponseResult<()> {
    match q.message.as_ref() {
        Some(MaybeInaccessibleMessage::Regular(msg)) => {
            let mut req = bot.edit_message_text(msg.chat.id, msg.id, text);
            if let Some(kb) = keyboard {
                req = req.reply_markup(kb);
            }
            req.await?;
        }
        Some(inaccessible) => {
            let mut req = bot.send_message(inaccessible.chat().id, text);
            if let Some(kb) = keyboard {
                req = req.reply_markup(kb);
            }
            req.await?;
        }
        None => {
            log::warn!("Callback {} has no reachable message, dropping response", q.id);
        }
    }
    Ok(())
}
