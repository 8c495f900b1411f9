//! Static informational panels: browse freelancers, help center, profile

use indoc::indoc;
use teloxide::prelude::*;
use teloxide::types::ChatId;

use crate::telegram::markdown::send_message_markdown_v2;

pub const BROWSE_TEXT: &str = indoc! {r"
    👥 *Browse Freelancers*

    Feature coming soon\! You'll be able to search and filter freelancers by category, rating, and budget\."
};

pub const HELP_TEXT: &str = indoc! {r"
    🛟 *FreelanceHub Help Center*

    *For Clients:*
    • Post jobs & hire talent
    • Pay with USDT or TON securely
    • Funds held in escrow until work approval

    *For Freelancers:*
    • Create your professional profile
    • Browse categories to find work

    *Payment Methods:*
    • USDT \(TRC20\) \- fast, low fees
    • TON \- instant, in\-Telegram payments

    *Support:*
    Need more help? Contact our support team\.

    *Coming Soon:*
    • Escrow payments
    • Freelancer profiles
    • Job posting & bidding
    • Rating system"
};

pub const PROFILE_TEXT: &str = indoc! {r"
    👤 *Profile Management*

    Freelancer profile system coming soon\!

    *You'll be able to:*
    • Add your bio and skills
    • Upload portfolio items
    • Set your hourly rate
    • Choose categories

    Stay tuned for updates\!"
};

/// "🔍 Browse Freelancers" menu entry.
pub async fn send_browse_panel(bot: &Bot, chat_id: ChatId) -> ResponseResult<()> {
    send_message_markdown_v2(bot, chat_id, BROWSE_TEXT, None).await?;
    Ok(())
}

/// "🛟 Help Center" menu entry and /help.
pub async fn send_help_panel(bot: &Bot, chat_id: ChatId) -> ResponseResult<()> {
    send_message_markdown_v2(bot, chat_id, HELP_TEXT, None).await?;
    Ok(())
}

/// /profile placeholder panel.
pub async fn send_profile_panel(bot: &Bot, chat_id: ChatId) -> ResponseResult<()> {
    send_message_markdown_v2(bot, chat_id, PROFILE_TEXT, None).await?;
    Ok(())
}
