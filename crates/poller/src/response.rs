//! Validation of homework API responses and rendering of status messages.
//!
//! Each step returns a `PollError` variant for the expected failure modes
//! (bad shape, empty list, unknown status) so the poller can inspect them
//! instead of relying on the cycle boundary to catch them.

use serde_json::Value;

use homework_common::types::{Homework, HomeworkStatuses, ReviewStatus};

use crate::error::PollError;

/// Confirm the response is an object with a `homeworks` list and an integer
/// `current_date`.
pub fn check_response(response: &Value) -> Result<HomeworkStatuses, PollError> {
    let object = response
        .as_object()
        .ok_or_else(|| PollError::Malformed(format!("expected an object, got {}", kind(response))))?;

    let homeworks = object
        .get("homeworks")
        .ok_or(PollError::MissingKey("homeworks"))?
        .as_array()
        .ok_or_else(|| PollError::Malformed("`homeworks` is not a list".to_string()))?;

    let current_date = object
        .get("current_date")
        .ok_or(PollError::MissingKey("current_date"))?
        .as_i64()
        .ok_or_else(|| PollError::Malformed("`current_date` is not an integer".to_string()))?;

    Ok(HomeworkStatuses {
        homeworks: homeworks.clone(),
        current_date,
    })
}

/// Take the most recent submission. The API orders by recency, so index 0
/// is authoritative and the rest of the list is ignored.
pub fn latest_homework(statuses: &HomeworkStatuses) -> Result<Homework, PollError> {
    let item = statuses.homeworks.first().ok_or(PollError::NoSubmissions)?;

    Ok(Homework {
        homework_name: string_field(item, "homework_name")?,
        status: string_field(item, "status")?,
    })
}

/// Render the fixed message for a submission's status.
pub fn parse_status(homework: &Homework) -> Result<String, PollError> {
    let status = ReviewStatus::from_code(&homework.status)
        .ok_or_else(|| PollError::UnknownStatus(homework.status.clone()))?;

    Ok(format!(
        "Status of homework \"{}\" changed. {}",
        homework.homework_name,
        status.verdict()
    ))
}

fn string_field(item: &Value, key: &'static str) -> Result<String, PollError> {
    match item.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(PollError::Malformed(format!(
            "`{key}` is {}, expected a string",
            kind(other)
        ))),
        None => Err(PollError::MissingKey(key)),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
