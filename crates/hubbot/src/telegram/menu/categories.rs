//! Category grid and the panels that use it

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::telegram::markdown::send_message_markdown_v2;
use hubcore::categories;

/// Inline grid over the configured category table, two buttons per row,
/// each carrying `category_<slug>` as callback data.
pub fn category_keyboard() -> InlineKeyboardMarkup {
    let mut rows = Vec::new();
    let mut current_row = Vec::new();

    for category in categories::all() {
        current_row.push(InlineKeyboardButton::callback(
            category.label,
            format!("category_{}", category.slug),
        ));
        if current_row.len() == 2 {
            rows.push(std::mem::take(&mut current_row));
        }
    }
    if !current_row.is_empty() {
        rows.push(current_row);
    }

    InlineKeyboardMarkup::new(rows)
}

/// "🗂 Categories" menu entry.
pub async fn send_category_picker(bot: &Bot, chat_id: ChatId) -> ResponseResult<()> {
    send_message_markdown_v2(
        bot,
        chat_id,
        "🏷️ *Select a Category:*",
        Some(category_keyboard().into()),
    )
    .await?;
    Ok(())
}

/// "📌 Post a Job" menu entry. Job posting itself is not built yet; the
/// prompt reuses the category grid as its first step.
pub async fn send_post_job_prompt(bot: &Bot, chat_id: ChatId) -> ResponseResult<()> {
    bot.send_message(chat_id, "📝 Select a category for your job:")
        .reply_markup(category_keyboard())
        .await?;
    Ok(())
}

/// Confirmation shown after a category button press.
pub fn selection_text(slug: &str) -> String {
    format!(
        "🎯 You selected: {}\n\nWhat would you like to do?",
        categories::humanize_slug(slug)
    )
}
