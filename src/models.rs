// Data models for TaskMaster

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single to-do item
///
/// Persisted as `{"id", "text", "completed", "createdAt"}` with `createdAt`
/// as an RFC 3339 timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Build a new pending task from already-normalized text
    pub(crate) fn new(text: String) -> Self {
        Self {
            id: new_task_id(),
            text,
            completed: false,
            created_at: Utc::now(),
        }
    }

    /// Case-insensitive substring match; `needle` must already be lower-case
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty() || self.text.to_lowercase().contains(needle)
    }
}

/// Aggregate counts over the full task collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        Self {
            total,
            completed,
            pending: total - completed,
        }
    }

    /// Rounded share of completed tasks, 0 for an empty collection
    pub fn completion_percentage(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u8
    }
}

/// Strip surrounding whitespace, rejecting blank input
pub fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Generate a fresh task id
///
/// UUIDv7 is time-ordered and carries a counter within the same
/// millisecond, so back-to-back calls never collide.
pub fn new_task_id() -> String {
    Uuid::now_v7().to_string()
}

/// Helper function to get current timestamp in milliseconds
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_now_ms() {
        let ts = now_ms();
        // Should be reasonable timestamp (after year 2020)
        assert!(ts > 1_600_000_000_000);
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  buy milk  "), Some("buy milk".to_string()));
        assert_eq!(normalize_text("x"), Some("x".to_string()));
        assert_eq!(normalize_text(""), None);
        assert_eq!(normalize_text(" \t\n "), None);
    }

    #[test]
    fn test_task_ids_are_unique_under_rapid_calls() {
        let ids: HashSet<String> = (0..10_000).map(|_| new_task_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_task_ids_are_time_ordered() {
        let first = new_task_id();
        let second = new_task_id();
        assert!(first < second);
    }

    #[test]
    fn test_new_task_defaults() {
        let task = Task::new("write report".to_string());
        assert_eq!(task.text, "write report");
        assert!(!task.completed);
        assert!(!task.id.is_empty());
    }

    #[test]
    fn test_task_matches_case_insensitive() {
        let task = Task::new("Buy MILK".to_string());
        assert!(task.matches("milk"));
        assert!(task.matches("buy m"));
        assert!(task.matches(""));
        assert!(!task.matches("bread"));
    }

    #[test]
    fn test_task_serialization_shape() {
        let task = Task {
            id: "t-1".to_string(),
            text: "Test".to_string(),
            completed: true,
            created_at: DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], "t-1");
        assert_eq!(json["text"], "Test");
        assert_eq!(json["completed"], true);
        assert_eq!(json["createdAt"], "2024-05-01T10:00:00Z");

        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn test_task_deserializes_browser_timestamp() {
        let json = r#"{"id":"1714557600000","text":"legacy","completed":false,"createdAt":"2024-05-01T10:00:00.000Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, "1714557600000");
        assert_eq!(task.created_at.timestamp_millis(), 1_714_557_600_000);
    }

    #[test]
    fn test_stats_and_percentage() {
        let mut tasks = vec![
            Task::new("a".to_string()),
            Task::new("b".to_string()),
            Task::new("c".to_string()),
        ];
        tasks[0].completed = true;

        let stats = TaskStats::from_tasks(&tasks);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.completion_percentage(), 33);

        assert_eq!(TaskStats::from_tasks(&[]).completion_percentage(), 0);
    }
}
