//! Error types for notification delivery.

use thiserror::Error;

/// Errors that can occur when delivering a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// HTTP request failed (connect, timeout, body decode)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The chat API answered but refused the message
    #[error("chat API rejected message (status {status}): {description}")]
    Api { status: u16, description: String },
}
