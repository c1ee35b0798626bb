//! Outbound chat notifications.
//!
//! The poller only needs a single operation, `send(text)`, delivered to the
//! one configured chat. `TelegramNotifier` implements it over the Bot API.

pub mod error;
pub mod telegram;

use std::future::Future;

pub use error::NotifyError;
pub use telegram::TelegramNotifier;

/// A destination that can receive plain-text notifications.
pub trait Notifier: Send + Sync {
    /// Deliver `text` to the configured chat.
    fn send(&self, text: &str) -> impl Future<Output = Result<(), NotifyError>> + Send;
}
