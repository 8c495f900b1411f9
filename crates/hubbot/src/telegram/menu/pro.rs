//! PRO subscription panel

use indoc::formatdoc;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::telegram::markdown::send_message_markdown_v2;
use hubcore::config::marketplace;

/// PRO panel body, MarkdownV2. The price line reads from config.
pub fn pro_text() -> String {
    let price = *marketplace::PRO_PRICE_USDT;
    let currency = marketplace::CURRENCY;
    formatdoc! {r"
        ⭐ *FreelanceHub PRO*

        *Benefits:*
        • Top placement in search results
        • Priority notifications for new jobs
        • Exclusive PRO badge on your profile
        • Full analytics dashboard
        • Access to premium categories

        *Price:* {price} {currency}/month"
    }
}

pub fn pro_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("⭐ Subscribe Now", "pro_subscribe")],
        vec![InlineKeyboardButton::callback("⬅️ Back", "main_menu")],
    ])
}

/// "⭐ Upgrade to Pro" menu entry.
pub async fn send_pro_panel(bot: &Bot, chat_id: ChatId) -> ResponseResult<()> {
    send_message_markdown_v2(bot, chat_id, pro_text(), Some(pro_keyboard().into())).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pro_text_carries_price_line() {
        let text = pro_text();
        assert!(text.contains("*FreelanceHub PRO*"));
        assert!(text.contains("USDT/month"));
    }

    #[test]
    fn test_pro_keyboard_actions() {
        let keyboard = pro_keyboard();
        assert_eq!(keyboard.inline_keyboard.len(), 2);
        match &keyboard.inline_keyboard[0][0].kind {
            teloxide::types::InlineKeyboardButtonKind::CallbackData(data) => {
                assert_eq!(data, "pro_subscribe");
            }
            other => panic!("expected callback button, got {:?}", other),
        }
    }
}
