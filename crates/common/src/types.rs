use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Review states reported by the homework API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl ReviewStatus {
    /// Parse a raw status code. Returns `None` for anything outside the
    /// known vocabulary.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "approved" => Some(ReviewStatus::Approved),
            "reviewing" => Some(ReviewStatus::Reviewing),
            "rejected" => Some(ReviewStatus::Rejected),
            _ => None,
        }
    }

    /// Human-readable verdict sent to the chat.
    pub fn verdict(&self) -> &'static str {
        match self {
            ReviewStatus::Approved => "Reviewed: the reviewer liked everything. Hooray!",
            ReviewStatus::Reviewing => "Taken for review by the reviewer.",
            ReviewStatus::Rejected => "Reviewed: the reviewer has comments.",
        }
    }
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewStatus::Approved => write!(f, "approved"),
            ReviewStatus::Reviewing => write!(f, "reviewing"),
            ReviewStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// The most recent submission taken from a poll response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Homework {
    pub homework_name: String,
    /// Raw status code; may be outside [`ReviewStatus`].
    pub status: String,
}

/// A validated homework API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeworkStatuses {
    /// Submissions ordered by recency, newest first. Items are kept raw and
    /// checked individually when extracted.
    pub homeworks: Vec<serde_json::Value>,
    pub current_date: i64,
}

/// Lower bound (Unix seconds) for the next homework fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PollCursor(i64);

impl PollCursor {
    pub fn new(timestamp: i64) -> Self {
        Self(timestamp)
    }

    /// Cursor positioned `days` before `now`.
    pub fn lookback(now: DateTime<Utc>, days: u64) -> Self {
        let back = i64::try_from(days)
            .ok()
            .and_then(Duration::try_days)
            .unwrap_or(Duration::MAX);
        let start = now
            .checked_sub_signed(back)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self(start.timestamp())
    }

    pub fn timestamp(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PollCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
