use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Configuration constants for the bot
/// Database file path
/// Read from DATABASE_PATH environment variable
/// Default: freelancehub.db
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "freelancehub.db".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: freelancehub.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "freelancehub.log".to_string()));

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Webhook URL for Telegram updates
/// Read from WEBHOOK_URL environment variable
/// When unset, the bot runs in long-polling mode
pub static WEBHOOK_URL: Lazy<Option<String>> = Lazy::new(|| env::var("WEBHOOK_URL").ok());

/// Custom Bot API server URL (self-hosted telegram-bot-api)
/// Read from BOT_API_URL environment variable
/// Default: none (use api.telegram.org)
pub static BOT_API_URL: Lazy<Option<String>> = Lazy::new(|| {
    env::var("BOT_API_URL").ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
});

/// Network configuration
pub mod network {
    use once_cell::sync::Lazy;
    use std::env;

    use super::Duration;

    /// Request timeout for Bot API HTTP requests (in seconds)
    /// The bot only sends short text messages, so a modest timeout is enough
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }

    /// Local port the webhook listener binds to
    /// Read from WEBHOOK_PORT environment variable
    /// Default: 8443
    pub static WEBHOOK_PORT: Lazy<u16> = Lazy::new(|| {
        env::var("WEBHOOK_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8443)
    });
}

/// Retry configuration
pub mod retry {
    use super::Duration;

    /// Maximum number of get_me attempts before giving up at startup
    pub const MAX_STARTUP_RETRIES: u32 = 5;

    /// Delay between startup connection attempts (in seconds)
    pub const STARTUP_RETRY_DELAY_SECS: u64 = 5;

    /// Startup retry delay duration
    pub fn startup_delay() -> Duration {
        Duration::from_secs(STARTUP_RETRY_DELAY_SECS)
    }

    /// Maximum number of retries for dispatcher reconnection
    pub const MAX_DISPATCHER_RETRIES: u32 = 5;

    /// Base for exponential backoff calculation
    pub const EXPONENTIAL_BACKOFF_BASE: u64 = 2;

    /// Backoff before dispatcher restart attempt `n` (1-based)
    pub fn exponential_backoff(attempt: u32) -> Duration {
        Duration::from_secs(EXPONENTIAL_BACKOFF_BASE.pow(attempt))
    }
}

/// Admin configuration
pub mod admin {
    use once_cell::sync::Lazy;
    use std::env;

    pub(super) fn parse_admin_ids(raw: &str) -> Vec<i64> {
        raw.split([',', ' ', '\n', '\t'])
            .filter_map(|part| part.trim().parse::<i64>().ok())
            .collect()
    }

    /// Admin user IDs (comma-separated)
    /// Read from ADMIN_IDS environment variable
    pub static ADMIN_IDS: Lazy<Vec<i64>> = Lazy::new(|| {
        env::var("ADMIN_IDS")
            .ok()
            .map(|raw| parse_admin_ids(&raw))
            .unwrap_or_default()
    });
}

/// Marketplace configuration
pub mod marketplace {
    use once_cell::sync::Lazy;
    use std::env;

    /// Currency suffix shown next to every balance amount
    pub const CURRENCY: &str = "USDT";

    /// Commission the platform takes on paid jobs
    /// Read from COMMISSION_RATE environment variable
    /// Default: 0.10 (10%)
    pub static COMMISSION_RATE: Lazy<f64> = Lazy::new(|| {
        env::var("COMMISSION_RATE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.10)
    });

    /// Monthly price of the PRO subscription, in CURRENCY
    /// Read from PRO_PRICE_USDT environment variable
    /// Default: 10
    pub static PRO_PRICE_USDT: Lazy<u32> = Lazy::new(|| {
        env::var("PRO_PRICE_USDT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10)
    });
}

#[cfg(test)]
mod tests {
    use super::admin::parse_admin_ids;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_admin_ids_comma_separated() {
        assert_eq!(parse_admin_ids("123,456,789"), vec![123, 456, 789]);
    }

    #[test]
    fn test_parse_admin_ids_mixed_separators() {
        assert_eq!(parse_admin_ids("123, 456\n789\t10"), vec![123, 456, 789, 10]);
    }

    #[test]
    fn test_parse_admin_ids_skips_garbage() {
        assert_eq!(parse_admin_ids("123,abc,,456"), vec![123, 456]);
    }

    #[test]
    fn test_parse_admin_ids_empty() {
        assert!(parse_admin_ids("").is_empty());
    }

    #[test]
    fn test_exponential_backoff_grows() {
        use super::retry::exponential_backoff;
        assert_eq!(exponential_backoff(1).as_secs(), 2);
        assert_eq!(exponential_backoff(3).as_secs(), 8);
    }
}
