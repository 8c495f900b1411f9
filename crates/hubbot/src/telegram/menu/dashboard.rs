//! Dashboard panel and balance rendering

use indoc::formatdoc;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::telegram::markdown::send_message_markdown_v2;
use hubcore::config::marketplace;
use hubcore::storage::db::{self, DbPool};
use hubcore::AppResult;

/// Render a balance as two decimals plus the currency suffix, e.g. `12.50 USDT`.
pub fn format_balance(balance: f64) -> String {
    format!("{:.2} {}", balance, marketplace::CURRENCY)
}

/// Dashboard panel body, MarkdownV2.
pub fn dashboard_text(balance: f64) -> String {
    // The rendered amount contains a decimal point, which MarkdownV2 treats
    // as a special character.
    let amount = format_balance(balance).replace('.', r"\.");
    formatdoc! {r"
        📊 *Your Dashboard*

        *Balance:* {amount}
        *Status:* Basic User

        *Quick Actions:*
        • Create profile
        • Post a job
        • Check balance"
    }
}

pub fn dashboard_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback("👤 Create Profile", "create_profile")],
        vec![InlineKeyboardButton::callback("💰 Check Balance", "check_balance")],
        vec![InlineKeyboardButton::callback("⬅️ Main Menu", "main_menu")],
    ])
}

/// Read a user's balance through the pool.
pub fn fetch_balance(db_pool: &DbPool, telegram_id: i64) -> AppResult<f64> {
    let conn = db::get_connection(db_pool)?;
    Ok(db::get_balance(&conn, telegram_id)?)
}

/// "📊 My Dashboard" menu entry. The balance lookup is the one registry
/// read on the text path; the caller decides via `AppError::is_storage`
/// whether a failure becomes the generic failure reply or propagates.
pub async fn send_dashboard(bot: &Bot, chat_id: ChatId, telegram_id: i64, db_pool: &DbPool) -> AppResult<()> {
    let balance = fetch_balance(db_pool, telegram_id)?;
    send_message_markdown_v2(bot, chat_id, dashboard_text(balance), Some(dashboard_keyboard().into())).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_balance_two_decimals() {
        assert_eq!(format_balance(12.5), "12.50 USDT");
        assert_eq!(format_balance(0.0), "0.00 USDT");
        assert_eq!(format_balance(3.999), "4.00 USDT");
    }

    #[test]
    fn test_dashboard_text_escapes_amount() {
        let text = dashboard_text(12.5);
        assert!(text.contains(r"*Balance:* 12\.50 USDT"));
        assert!(text.contains("*Your Dashboard*"));
    }

    #[test]
    fn test_fetch_balance_on_dead_pool_is_a_storage_error() {
        // The dispatcher boundary turns storage errors into the generic
        // failure reply; the classification must hold for pool failures.
        let manager = r2d2_sqlite::SqliteConnectionManager::file("/nonexistent-dir/users.db");
        let pool = r2d2::Pool::builder()
            .connection_timeout(std::time::Duration::from_millis(100))
            .build_unchecked(manager);

        let err = fetch_balance(&pool, 1).unwrap_err();
        assert!(err.is_storage());
    }

    #[test]
    fn test_dashboard_keyboard_actions() {
        let keyboard = dashboard_keyboard();
        assert_eq!(keyboard.inline_keyboard.len(), 3);
        let data: Vec<_> = keyboard
            .inline_keyboard
            .iter()
            .flatten()
            .map(|b| match &b.kind {
                teloxide::types::InlineKeyboardButtonKind::CallbackData(data) => data.clone(),
                other => panic!("expected callback button, got {:?}", other),
            })
            .collect();
        assert_eq!(data, vec!["create_profile", "check_balance", "main_menu"]);
    }
}
