// Data models for TaskStore

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend-assigned task identifier
///
/// The backend may hand out either strings or integers. The value is kept as
/// given and used in resource paths. Numeric ids must fit in an `i64`;
/// fractional or larger numbers are rejected as malformed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Number(i64),
    Text(String),
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Number(n) => write!(f, "{}", n),
            TaskId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId::Text(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId::Text(s)
    }
}

impl From<i64> for TaskId {
    fn from(n: i64) -> Self {
        TaskId::Number(n)
    }
}

/// A task as held by the store, always carrying the canonical `id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub completed: bool,
}

/// Payload for creating a task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Request body with defaults filled in
    pub fn to_body(&self) -> TaskPatch {
        TaskPatch {
            title: self.title.clone(),
            description: self.description.clone().unwrap_or_default(),
            completed: self.completed.unwrap_or(false),
        }
    }
}

/// The updatable fields of a task; exactly what is sent on create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl TaskPatch {
    /// Same title and description, completion flipped
    pub fn toggled(task: &Task) -> Self {
        Self {
            completed: !task.completed,
            ..Self::from(task)
        }
    }
}

impl From<&Task> for TaskPatch {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            completed: task.completed,
        }
    }
}
