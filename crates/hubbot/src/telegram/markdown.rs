use teloxide::prelude::*;
use teloxide::types::{ParseMode, ReplyMarkup};
use teloxide::RequestError;

/// Characters MarkdownV2 requires to be backslash-escaped outside entities.
const SPECIAL: [char; 18] = [
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Escape every MarkdownV2 special character in `text`.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn is_markdown_parse_error(err: &RequestError) -> bool {
    err.to_string().to_lowercase().contains("can't parse entities")
}

/// Send a MarkdownV2 message and auto-escape on parse errors.
///
/// Templates are pre-escaped, so the retry path only fires when a template
/// regresses; the retried message loses its formatting but still reaches
/// the user.
pub async fn send_message_markdown_v2(
    bot: &Bot,
    chat_id: ChatId,
    text: impl Into<String>,
    keyboard: Option<ReplyMarkup>,
) -> ResponseResult<Message> {
    let raw_text = text.into();
    let mut req = bot
        .send_message(chat_id, raw_text.clone())
        .parse_mode(ParseMode::MarkdownV2);
    if let Some(kb) = keyboard.clone() {
        req = req.reply_markup(kb);
    }

    match req.await {
        Ok(msg) => Ok(msg),
        Err(e) if is_markdown_parse_error(&e) => {
            log::warn!("MarkdownV2 parse failure, resending escaped: {}", e);
            let escaped = escape_markdown(&raw_text);
            let mut retry = bot.send_message(chat_id, escaped).parse_mode(ParseMode::MarkdownV2);
            if let Some(kb) = keyboard {
                retry = retry.reply_markup(kb);
            }
            retry.await
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("a.b!c"), r"a\.b\!c");
        assert_eq!(escape_markdown("*bold* (note)"), r"\*bold\* \(note\)");
        assert_eq!(escape_markdown("plain text"), "plain text");
    }

    #[test]
    fn test_escape_markdown_keeps_emoji() {
        assert_eq!(escape_markdown("🔍 Browse"), "🔍 Browse");
    }
}
