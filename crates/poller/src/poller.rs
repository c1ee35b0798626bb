use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;

use homework_common::types::PollCursor;
use homework_notifier::Notifier;

use crate::client::HomeworkSource;
use crate::error::PollError;
use crate::response::{check_response, latest_homework, parse_status};

/// Prefix of every error report sent to the chat.
pub const ERROR_PREFIX: &str = "Operation failed";

/// Last message delivered per category. A message is only sent when it
/// differs from its slot, and a slot only changes after a successful send.
#[derive(Debug, Clone, Default)]
pub struct NotificationState {
    last_status: Option<String>,
    last_error: Option<String>,
}

impl NotificationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_new_status(&self, message: &str) -> bool {
        self.last_status.as_deref() != Some(message)
    }

    pub fn is_new_error(&self, message: &str) -> bool {
        self.last_error.as_deref() != Some(message)
    }

    pub fn record_status(&mut self, message: String) {
        self.last_status = Some(message);
    }

    pub fn record_error(&mut self, message: String) {
        self.last_error = Some(message);
    }

    pub fn last_status(&self) -> Option<&str> {
        self.last_status.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

/// Result of a cycle that completed without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new status message was delivered.
    Notified,
    /// The status message matched the last one sent.
    Unchanged,
}

/// Polls the homework API on a fixed interval and reports status changes
/// and failures to the chat.
pub struct HomeworkPoller<S, N> {
    source: S,
    notifier: N,
    cursor: PollCursor,
    retry_interval: Duration,
    state: NotificationState,
}

impl<S, N> HomeworkPoller<S, N>
where
    S: HomeworkSource,
    N: Notifier,
{
    pub fn new(source: S, notifier: N, cursor: PollCursor, retry_interval: Duration) -> Self {
        Self {
            source,
            notifier,
            cursor,
            retry_interval,
            state: NotificationState::new(),
        }
    }

    pub fn cursor(&self) -> PollCursor {
        self.cursor
    }

    pub fn state(&self) -> &NotificationState {
        &self.state
    }

    /// Start the polling loop. Runs indefinitely until the task is cancelled.
    pub async fn run(&mut self) {
        tracing::info!(
            cursor = %self.cursor,
            retry_interval_secs = self.retry_interval.as_secs(),
            "Homework poller started"
        );

        loop {
            // `tick` absorbs every failure, so the delay follows every cycle.
            self.tick().await;
            tokio::time::sleep(self.retry_interval).await;
        }
    }

    /// Run one cycle and report its failure, if any. Never fails.
    pub async fn tick(&mut self) {
        let result = AssertUnwindSafe(self.run_cycle()).catch_unwind().await;

        let error = match result {
            Ok(Ok(_)) => return,
            Ok(Err(e)) => e,
            Err(payload) => PollError::Unexpected(panic_message(payload)),
        };

        self.report_failure(error).await;
    }

    /// Fetch, validate, extract and format the latest status, then notify if
    /// it changed since the last delivered message.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome, PollError> {
        let raw = self.source.fetch(self.cursor.timestamp()).await?;
        let statuses = check_response(&raw)?;

        tracing::debug!(
            current_date = statuses.current_date,
            submissions = statuses.homeworks.len(),
            "Homework statuses received"
        );

        let homework = latest_homework(&statuses)?;
        let message = parse_status(&homework)?;

        if !self.state.is_new_status(&message) {
            tracing::debug!(
                homework = %homework.homework_name,
                status = %homework.status,
                "Status unchanged"
            );
            return Ok(CycleOutcome::Unchanged);
        }

        self.notifier.send(&message).await?;
        self.state.record_status(message);

        tracing::info!(
            homework = %homework.homework_name,
            status = %homework.status,
            "Status change notified"
        );
        Ok(CycleOutcome::Notified)
    }

    async fn report_failure(&mut self, error: PollError) {
        tracing::error!(error = %error, "Poll cycle failed");

        // Reporting a failed send through the same chat could loop forever.
        if error.is_delivery() {
            return;
        }

        let message = format!("{ERROR_PREFIX}: {error}");
        if !self.state.is_new_error(&message) {
            tracing::debug!("Error already reported, not sending again");
            return;
        }

        match self.notifier.send(&message).await {
            Ok(()) => self.state.record_error(message),
            Err(e) => tracing::error!(error = %e, "Failed to report error to chat"),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state_accepts_anything() {
        let state = NotificationState::new();
        assert!(state.is_new_status("a"));
        assert!(state.is_new_error("a"));
        assert_eq!(state.last_status(), None);
        assert_eq!(state.last_error(), None);
    }

    #[test]
    fn test_slots_are_independent() {
        let mut state = NotificationState::new();
        state.record_status("same".to_string());
        assert!(!state.is_new_status("same"));
        assert!(state.is_new_error("same"));

        state.record_error("boom".to_string());
        assert!(!state.is_new_error("boom"));
        assert!(state.is_new_error("other"));
        assert_eq!(state.last_status(), Some("same"));
    }

    #[test]
    fn test_panic_message_payloads() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new(String::from("owned"))), "owned");
        assert_eq!(panic_message(Box::new(7u8)), "panic with non-string payload");
    }
}
