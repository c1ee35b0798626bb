use thiserror::Error;

use homework_notifier::NotifyError;

/// Recoverable failures of a single poll cycle. None of these stop the loop.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("homework API request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("homework API returned status {status} for {endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },

    #[error("homework API returned a non-JSON body: {0}")]
    InvalidBody(String),

    #[error("malformed homework API response: {0}")]
    Malformed(String),

    #[error("key `{0}` missing from homework API response")]
    MissingKey(&'static str),

    #[error("no submitted homework yet")]
    NoSubmissions,

    #[error("unknown homework status `{0}`")]
    UnknownStatus(String),

    #[error("notification delivery failed: {0}")]
    Delivery(#[from] NotifyError),

    #[error("unexpected fault: {0}")]
    Unexpected(String),
}

impl PollError {
    /// Whether this failure came from the chat itself. Such failures are
    /// logged only, never reported through the chat.
    pub fn is_delivery(&self) -> bool {
        matches!(self, PollError::Delivery(_))
    }
}
