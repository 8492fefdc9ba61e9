use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Priority lane a task lives in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Lanes in display order.
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Fixed rank used by the priority comparator (High=3, Medium=2, Low=1).
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Lenient parse for user and transport input. Anything that is not one of
    /// the three lanes (including the `none` placeholder) yields `None`.
    pub fn parse(input: &str) -> Option<Priority> {
        input.parse().ok()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority `{0}` (expected high, medium or low)")]
pub struct ParsePriorityError(pub String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" | "h" => Ok(Priority::High),
            "medium" | "m" => Ok(Priority::Medium),
            "low" | "l" => Ok(Priority::Low),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}

/// Task identity. Assigned from the creation timestamp in milliseconds, so it
/// doubles as the chronological sort key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TaskId {
    fn from(value: i64) -> Self {
        TaskId(value)
    }
}

/// A task identifier as it arrives from the interaction layer: drag-and-drop
/// transports serialize ids as text, dialogs hand back numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RawTaskId {
    Number(i64),
    Text(String),
}

impl RawTaskId {
    /// Coerce to a `TaskId`. Text is read as its leading integer, so `"42"`
    /// and `" 42px"` both resolve to 42; text without one resolves to `None`.
    pub fn resolve(&self) -> Option<TaskId> {
        match self {
            RawTaskId::Number(n) => Some(TaskId(*n)),
            RawTaskId::Text(text) => leading_integer(text).map(TaskId),
        }
    }
}

fn leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => ("-", &trimmed[1..]),
        Some(b'+') => ("", &trimmed[1..]),
        _ => ("", trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    format!("{sign}{}", &rest[..digits_len]).parse().ok()
}

impl From<TaskId> for RawTaskId {
    fn from(id: TaskId) -> Self {
        RawTaskId::Number(id.0)
    }
}

impl From<i64> for RawTaskId {
    fn from(value: i64) -> Self {
        RawTaskId::Number(value)
    }
}

impl From<&str> for RawTaskId {
    fn from(value: &str) -> Self {
        RawTaskId::Text(value.to_string())
    }
}

impl From<String> for RawTaskId {
    fn from(value: String) -> Self {
        RawTaskId::Text(value)
    }
}

/// Task entity, stored exactly in this shape under the `tasks` key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub priority: Priority,
    pub completed: bool,
}

impl Task {
    pub fn new(id: TaskId, text: impl Into<String>, priority: Priority) -> Self {
        Self {
            id,
            text: text.into(),
            priority,
            completed: false,
        }
    }
}

/// Trimmed task text, or `None` when nothing but whitespace is left.
pub fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_parse_rejects_placeholder() {
        assert_eq!(Priority::parse("High"), Some(Priority::High));
        assert_eq!(Priority::parse(" low "), Some(Priority::Low));
        assert_eq!(Priority::parse("none"), None);
        assert_eq!(Priority::parse(""), None);
    }

    #[test]
    fn ranks_descend_from_high() {
        assert!(Priority::High.rank() > Priority::Medium.rank());
        assert!(Priority::Medium.rank() > Priority::Low.rank());
    }

    #[test]
    fn raw_ids_coerce_numeric_text() {
        assert_eq!(RawTaskId::from("5").resolve(), Some(TaskId(5)));
        assert_eq!(RawTaskId::from(5).resolve(), Some(TaskId(5)));
        assert_eq!(RawTaskId::from("12abc").resolve(), Some(TaskId(12)));
        assert_eq!(RawTaskId::from("-3").resolve(), Some(TaskId(-3)));
        assert_eq!(RawTaskId::from("abc").resolve(), None);
        assert_eq!(RawTaskId::from("").resolve(), None);
    }

    #[test]
    fn raw_ids_deserialize_from_number_or_string() {
        let ids: Vec<RawTaskId> = serde_json::from_str(r#"[7, "8"]"#).expect("parse");
        assert_eq!(ids[0].resolve(), Some(TaskId(7)));
        assert_eq!(ids[1].resolve(), Some(TaskId(8)));
    }

    #[test]
    fn task_serializes_in_storage_shape() {
        let task = Task::new(TaskId(1700000000000), "Buy milk", Priority::Low);
        let json = serde_json::to_value(&task).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1700000000000i64,
                "text": "Buy milk",
                "priority": "Low",
                "completed": false,
            })
        );
    }

    #[test]
    fn normalize_text_trims_and_rejects_blank() {
        assert_eq!(normalize_text("  hi  ").as_deref(), Some("hi"));
        assert_eq!(normalize_text("   "), None);
    }
}
