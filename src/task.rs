//! Tasks and the in-memory task list.
//!
//! The list is kept newest first: `add` prepends and nothing ever re-sorts.
//! Every mutation is lenient. Blank text, unknown ids and an empty
//! clear are no-ops rather than errors, so repeated deletes and toggles
//! from a stale view are harmless.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// A single to-do entry, serialized as `{id, text, completed, createdAt}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl Task {
    /// Build a new open task, or `None` when `text` is blank after trimming.
    pub fn new(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            completed: false,
            created_at: Utc::now().timestamp_millis(),
        })
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_at)
    }
}

/// Ordered task list, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt an existing sequence, checking the id and text invariants.
    pub fn from_tasks(tasks: Vec<Task>) -> Result<Self> {
        check_invariants(&tasks)?;
        Ok(Self { tasks })
    }

    /// Add a task built from `text` at the front of the list.
    ///
    /// Returns the new task, or `None` if the trimmed text was empty.
    pub fn add(&mut self, text: &str) -> Option<&Task> {
        let mut task = Task::new(text)?;
        while self.get(&task.id).is_some() {
            task.id = Uuid::new_v4().to_string();
        }
        self.tasks.insert(0, task);
        self.tasks.first()
    }

    /// Flip `completed` on the task with `id`; returns the new value.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        task.completed = !task.completed;
        Some(task.completed)
    }

    /// Remove the task with `id`, returning it if it was present.
    pub fn delete(&mut self, id: &str) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id == id)?;
        Some(self.tasks.remove(index))
    }

    /// Drop every completed task; returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        before - self.tasks.len()
    }

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn has_completed(&self) -> bool {
        self.tasks.iter().any(|task| task.completed)
    }

    /// Resolve a full id or a unique id prefix.
    ///
    /// An exact match always wins. No match is `Ok(None)` so callers can
    /// fall through to the no-op path; several matches are an error.
    pub fn resolve_id(&self, input: &str) -> Result<Option<String>> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::InvalidArgument("task id cannot be empty".to_string()));
        }
        if let Some(task) = self.get(input) {
            return Ok(Some(task.id.clone()));
        }

        let needle = input.to_ascii_lowercase();
        let matches: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|task| task.id.to_ascii_lowercase().starts_with(&needle))
            .collect();
        match matches.as_slice() {
            [] => Ok(None),
            [task] => Ok(Some(task.id.clone())),
            many => Err(Error::AmbiguousTaskId {
                prefix: input.to_string(),
                matches: many.len(),
            }),
        }
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }
}

fn check_invariants(tasks: &[Task]) -> Result<()> {
    let mut seen = HashSet::new();
    for task in tasks {
        if task.id.is_empty() {
            return Err(Error::CorruptSlot("task with empty id".to_string()));
        }
        if !seen.insert(task.id.as_str()) {
            return Err(Error::CorruptSlot(format!("duplicate task id '{}'", task.id)));
        }
        if task.text.trim().is_empty() {
            return Err(Error::CorruptSlot(format!("task '{}' has empty text", task.id)));
        }
    }
    Ok(())
}
