//! Background scan tasks.
//!
//! Submitting a task returns an id immediately; the work runs on the
//! blocking pool and its status is kept in a map the HTTP layer can poll.
//! There is no cancellation, retry or eviction.

pub mod registry;

use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::scanner::ImportSummary;

pub use registry::{TaskRegistry, TaskReporter};

/// Unique identifier for a background task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(pub Uuid);

impl TaskId {
    pub fn new() -> Self {
        TaskId(Uuid::new_v4())
    }

    /// `None` for anything that is not a UUID; such ids can never be known.
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value).ok().map(TaskId)
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State of a background task, serialized with a `state` tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum TaskStatus {
    /// Waiting for a worker slot.
    Pending,
    Running { current: usize, total: usize },
    Done(ImportSummary),
    Error { message: String, trace: String },
}

impl TaskStatus {
    #[cfg(test)]
    pub(crate) fn is_finished(&self) -> bool {
        matches!(self, TaskStatus::Done(_) | TaskStatus::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_id_parse() {
        let id = TaskId::new();
        assert_eq!(TaskId::parse(&id.to_string()), Some(id));
        assert_eq!(TaskId::parse("not-a-task"), None);
    }

    #[test]
    fn test_status_wire_shape() {
        assert_eq!(serde_json::to_value(TaskStatus::Pending).unwrap(), json!({"state": "pending"}));

        let done = TaskStatus::Done(ImportSummary {
            album_id: 3,
            album_name: "Holiday".to_string(),
            photos_scanned: 12,
        });
        assert_eq!(
            serde_json::to_value(&done).unwrap(),
            json!({"state": "done", "album_id": 3, "album_name": "Holiday", "photos_scanned": 12})
        );
        assert!(done.is_finished());

        let running = TaskStatus::Running { current: 1, total: 4 };
        assert_eq!(
            serde_json::to_value(&running).unwrap(),
            json!({"state": "running", "current": 1, "total": 4})
        );
        assert!(!running.is_finished());
    }
}
