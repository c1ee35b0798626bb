use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

const DEFAULT_PRACTICUM_ENDPOINT: &str =
    "https://practicum.yandex.ru/api/user_api/homework_statuses/";
const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
const DEFAULT_LOG_FILE: &str = "main.log";

/// Global application configuration loaded from environment variables.
#[derive(Clone)]
pub struct AppConfig {
    /// OAuth token for the homework review API
    pub practicum_token: String,

    /// Telegram bot token
    pub telegram_token: String,

    /// Chat that receives every notification
    pub telegram_chat_id: String,

    /// Homework statuses endpoint
    pub practicum_endpoint: String,

    /// Telegram Bot API base URL
    pub telegram_api_url: String,

    /// Fixed delay between poll cycles in seconds (default: 600)
    pub retry_interval_secs: u64,

    /// How far back the first poll looks, in days (default: 10)
    pub lookback_days: u64,

    /// Per-request timeout in seconds, never larger than the retry interval (default: 30)
    pub http_timeout_secs: u64,

    /// Persistent log file. `None` when `LOG_FILE` is set to an empty string.
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// All missing required variables are reported at once so a fresh
    /// deployment can be fixed in a single pass.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str, missing: &mut Vec<&'static str>| {
            match lookup(key).filter(|v| !v.trim().is_empty()) {
                Some(value) => value,
                None => {
                    missing.push(key);
                    String::new()
                }
            }
        };

        let mut missing = Vec::new();
        let practicum_token = required("PRACTICUM_TOKEN", &mut missing);
        let telegram_token = required("TELEGRAM_TOKEN", &mut missing);
        let telegram_chat_id = required("TELEGRAM_CHAT_ID", &mut missing);

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let retry_interval_secs = parse_or(&lookup, "RETRY_TIME_SECS", 600)?;
        if retry_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "RETRY_TIME_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }
        let http_timeout_secs =
            parse_or(&lookup, "HTTP_TIMEOUT_SECS", 30)?.clamp(1, retry_interval_secs);

        Ok(Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
            practicum_endpoint: lookup("PRACTICUM_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_PRACTICUM_ENDPOINT.to_string()),
            telegram_api_url: lookup("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            retry_interval_secs,
            lookback_days: parse_or(&lookup, "LOOKBACK_DAYS", 10)?,
            http_timeout_secs,
            log_file: log_file_from(&lookup),
        })
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("practicum_endpoint", &self.practicum_endpoint)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("retry_interval_secs", &self.retry_interval_secs)
            .field("lookback_days", &self.lookback_days)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("log_file", &self.log_file)
            .finish()
    }
}

/// Resolve the log file path from the process environment.
///
/// Logging starts before the rest of the configuration is validated, so a
/// missing token can still be written to the persistent sink.
pub fn log_file_from_env() -> Option<PathBuf> {
    dotenvy::dotenv().ok();
    log_file_from(|key| std::env::var(key).ok())
}

fn log_file_from<F>(lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup("LOG_FILE") {
        Some(path) if path.trim().is_empty() => None,
        Some(path) => Some(PathBuf::from(path)),
        None => Some(PathBuf::from(DEFAULT_LOG_FILE)),
    }
}

fn parse_or<F>(lookup: &F, var: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            var,
            reason: format!("expected a non-negative integer, got {raw:?}"),
        }),
        None => Ok(default),
    }
}
