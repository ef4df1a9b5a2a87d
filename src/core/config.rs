use std::env;
use std::time::Duration;

use crate::errors::BotError;

pub const DEFAULT_WORDCAB_API_URL: &str = "https://wordcab.com/api/v1";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 360;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub slack_bot_token: String,
    pub slack_signing_secret: String,
    pub wordcab_api_key: String,
    pub wordcab_api_url: String,
    pub bind_addr: String,
    pub poll_interval: Duration,
    pub poll_max_attempts: u32,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns `BotError::ConfigError` naming the first required variable that is missing.
    pub fn from_env() -> Result<Self, BotError> {
        Ok(Self {
            slack_bot_token: required("SLACK_BOT_TOKEN")?,
            slack_signing_secret: required("SLACK_SIGNING_SECRET")?,
            wordcab_api_key: required("WORDCAB_API_KEY")?,
            wordcab_api_url: env::var("WORDCAB_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_WORDCAB_API_URL.to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            poll_interval: Duration::from_secs(parse_or(
                env::var("POLL_INTERVAL_SECS").ok().as_deref(),
                DEFAULT_POLL_INTERVAL_SECS,
            )),
            poll_max_attempts: parse_or(
                env::var("POLL_MAX_ATTEMPTS").ok().as_deref(),
                DEFAULT_POLL_MAX_ATTEMPTS,
            ),
        })
    }
}

fn required(name: &str) -> Result<String, BotError> {
    env::var(name).map_err(|e| BotError::ConfigError(format!("{name}: {e}")))
}

/// Parses an optional numeric setting, keeping the default for absent, zero or garbage values.
fn parse_or<T>(raw: Option<&str>, default: T) -> T
where
    T: std::str::FromStr + PartialEq + Default,
{
    raw.and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v != T::default())
        .unwrap_or(default)
}
