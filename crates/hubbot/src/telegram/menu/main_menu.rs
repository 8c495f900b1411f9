//! Main menu keyboard, welcome panel and the fallback reply

use indoc::formatdoc;
use strum::IntoEnumIterator;
use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup, ReplyMarkup};

use super::MenuAction;
use crate::telegram::markdown::send_message_markdown_v2;

/// Reply text for anything that matches no menu label.
pub const FALLBACK_TEXT: &str = "Please use the menu buttons below!";

/// The persistent reply keyboard: the six menu labels, two per row.
pub fn main_menu_keyboard() -> KeyboardMarkup {
    let mut rows = Vec::new();
    let mut current_row = Vec::new();

    for action in MenuAction::iter() {
        current_row.push(KeyboardButton::new(action.label()));
        if current_row.len() == 2 {
            rows.push(std::mem::take(&mut current_row));
        }
    }
    if !current_row.is_empty() {
        rows.push(current_row);
    }

    KeyboardMarkup::new(rows).resize_keyboard()
}

/// Welcome panel, MarkdownV2. The menu entries are rendered from
/// `MenuAction` so the panel always lists exactly what the keyboard offers.
pub fn welcome_text() -> String {
    let entries = MenuAction::iter()
        .map(|action| format!(r"*{}* \- {}", action.label(), action.blurb()))
        .collect::<Vec<_>>()
        .join("\n");

    formatdoc! {r"
        🤖 Welcome to *FreelanceHub*\!

        The global marketplace where talent meets opportunity\.

        *What would you like to do?*

        {entries}

        *Choose an option below to begin\!*"
    }
}

/// /start: welcome panel plus the reply keyboard.
pub async fn send_welcome(bot: &Bot, chat_id: ChatId) -> ResponseResult<()> {
    send_message_markdown_v2(
        bot,
        chat_id,
        welcome_text(),
        Some(ReplyMarkup::Keyboard(main_menu_keyboard())),
    )
    .await?;
    Ok(())
}

/// Unmatched text: nudge toward the menu and re-display it.
pub async fn send_fallback(bot: &Bot, chat_id: ChatId) -> ResponseResult<()> {
    bot.send_message(chat_id, FALLBACK_TEXT)
        .reply_markup(main_menu_keyboard())
        .await?;
    Ok(())
}

/// Re-display the main menu (the `main_menu` callback's follow-up message).
pub async fn send_main_menu(bot: &Bot, chat_id: ChatId) -> ResponseResult<()> {
    bot.send_message(chat_id, "Main Menu:")
        .reply_markup(main_menu_keyboard())
        .await?;
    Ok(())
}
