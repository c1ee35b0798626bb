use std::time::Duration;

use serde::{Deserialize, Serialize};

use homework_common::config::AppConfig;

use crate::Notifier;
use crate::error::NotifyError;

/// Telegram Bot API client bound to a single chat.
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_url: String,
    token: String,
    chat_id: String,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
}

impl TelegramNotifier {
    pub fn new(
        api_url: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            chat_id: chat_id.into(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, NotifyError> {
        Self::new(
            &config.telegram_api_url,
            &config.telegram_token,
            &config.telegram_chat_id,
            config.http_timeout(),
        )
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.token)
    }

    async fn deliver(&self, text: &str) -> Result<(), NotifyError> {
        // The URL carries the bot token, strip it from transport errors.
        let response = self
            .client
            .post(self.send_message_url())
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await
            .map_err(|e| NotifyError::Http(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NotifyError::Http(e.without_url()))?;
        let parsed = serde_json::from_str::<ApiResponse>(&body).ok();

        match parsed {
            Some(ApiResponse { ok: true, .. }) if status.is_success() => Ok(()),
            Some(ApiResponse { description, .. }) => Err(NotifyError::Api {
                status: status.as_u16(),
                description: description.unwrap_or_else(|| "no description".to_string()),
            }),
            None => Err(NotifyError::Api {
                status: status.as_u16(),
                description: format!("unexpected response body: {}", truncate(&body, 200)),
            }),
        }
    }
}

impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        match self.deliver(text).await {
            Ok(()) => {
                tracing::info!(chat_id = %self.chat_id, "Message sent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(chat_id = %self.chat_id, error = %e, "Message not sent");
                Err(e)
            }
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
