// Wire representation of tasks and id normalization

use crate::models::{Task, TaskId};
use eyre::{Context, Result, eyre};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// A task as the backend returns it
///
/// The identifier may arrive as `id` or `_id`. Nothing outside this module
/// sees `_id`: every response goes through [`normalize`] first.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRecord {
    #[serde(default)]
    pub id: Option<TaskId>,
    #[serde(default, rename = "_id")]
    pub legacy_id: Option<TaskId>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Collapse `id`/`_id` into the canonical `id`; `id` wins when both are set
pub fn normalize(record: TaskRecord) -> Result<Task> {
    let id = record
        .id
        .or(record.legacy_id)
        .ok_or_else(|| eyre!("Task record has neither `id` nor `_id`: {}", record.title))?;

    Ok(Task {
        id,
        title: record.title,
        description: record.description.unwrap_or_default(),
        completed: record.completed.unwrap_or(false),
    })
}

/// Parse and normalize a single task from a response body
pub fn normalize_value(value: Value) -> Result<Task> {
    let record: TaskRecord = serde_json::from_value(value).context("Response is not a task")?;
    normalize(record)
}

/// Parse and normalize a task collection from a response body
///
/// The body must be an array. Entries that are not tasks or carry no id are
/// skipped with a warning rather than failing the whole collection.
pub fn normalize_list(value: Value) -> Result<Vec<Task>> {
    let entries = match value {
        Value::Array(entries) => entries,
        other => return Err(eyre!("Expected a task array, got: {}", type_name(&other))),
    };

    let mut tasks = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        match normalize_value(entry) {
            Ok(task) => tasks.push(task),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed task in collection");
            }
        }
    }

    Ok(tasks)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
