//! View filtering over the task list.
//!
//! Filtering never mutates or re-sorts; it only selects. The filter mode is
//! view state and is never persisted with the tasks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::task::Task;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    #[default]
    All,
    Active,
    #[serde(alias = "done")]
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }

    /// Visible subset of `tasks`, in input order.
    pub fn apply(self, tasks: &[Task]) -> Vec<&Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }

    /// The next mode in tab order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Filter::All => Filter::Active,
            Filter::Active => Filter::Completed,
            Filter::Completed => Filter::All,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" | "done" => Ok(Filter::Completed),
            _ => Err(Error::InvalidArgument(format!(
                "invalid filter '{}': expected all, active, or completed",
                s
            ))),
        }
    }
}

/// Number of tasks not yet completed ("items left").
pub fn active_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|task| !task.completed).count()
}

/// Everything a front end needs to draw one frame of the list.
#[derive(Debug, Clone, Serialize)]
pub struct ListView<'a> {
    pub filter: Filter,
    pub tasks: Vec<&'a Task>,
    pub total: usize,
    pub active_count: usize,
    pub has_completed: bool,
}

impl<'a> ListView<'a> {
    pub fn derive(tasks: &'a [Task], filter: Filter) -> Self {
        Self {
            filter,
            tasks: filter.apply(tasks),
            total: tasks.len(),
            active_count: active_count(tasks),
            has_completed: tasks.iter().any(|task| task.completed),
        }
    }

    /// Placeholder line for an empty view, if the view is empty.
    pub fn empty_message(&self) -> Option<String> {
        if self.total == 0 {
            Some("You're all caught up!".to_string())
        } else if self.tasks.is_empty() {
            Some(format!("No {} tasks found.", self.filter))
        } else {
            None
        }
    }

    pub fn items_left_label(&self) -> String {
        format!("{} items left", self.active_count)
    }
}
