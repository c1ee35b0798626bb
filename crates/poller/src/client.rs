use std::future::Future;
use std::time::Duration;

use homework_common::config::AppConfig;

use crate::error::PollError;

/// Source of raw homework status responses.
pub trait HomeworkSource: Send + Sync {
    /// Fetch every submission updated at or after `from_date` (Unix seconds).
    fn fetch(
        &self,
        from_date: i64,
    ) -> impl Future<Output = Result<serde_json::Value, PollError>> + Send;
}

/// HTTP client for the homework statuses endpoint.
pub struct PracticumClient {
    client: reqwest::Client,
    endpoint: String,
    auth_header: String,
}

impl PracticumClient {
    pub fn new(
        endpoint: impl Into<String>,
        token: &str,
        timeout: Duration,
    ) -> Result<Self, PollError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(PollError::Request)?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            auth_header: format!("OAuth {token}"),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, PollError> {
        Self::new(
            &config.practicum_endpoint,
            &config.practicum_token,
            config.http_timeout(),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl HomeworkSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<serde_json::Value, PollError> {
        tracing::debug!(endpoint = %self.endpoint, from_date, "Requesting homework statuses");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("from_date", from_date)])
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .send()
            .await
            .map_err(|e| PollError::Request(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PollError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: self.endpoint.clone(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| PollError::Request(e.without_url()))?;

        serde_json::from_str(&body).map_err(|e| PollError::InvalidBody(e.to_string()))
    }
}
