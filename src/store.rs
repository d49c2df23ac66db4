//! The task store: the in-memory list plus its persistence port.
//!
//! Every mutation that was not rejected outright is mirrored to the port
//! immediately. If the write fails the in-memory change is kept and the
//! error is returned, so callers can keep working with the current state.

use crate::error::Result;
use crate::filter::{self, Filter, ListView};
use crate::persistence::TaskPersistence;
use crate::task::{Task, TaskList};

pub struct TaskStore<P: TaskPersistence> {
    tasks: TaskList,
    persistence: P,
}

impl<P: TaskPersistence> TaskStore<P> {
    /// Rehydrate from the port. Undecodable data loads as empty; a slot
    /// that cannot be read is an error.
    pub fn open(persistence: P) -> Result<Self> {
        let tasks = persistence.load()?;
        tracing::debug!(tasks = tasks.len(), "task store opened");
        Ok(Self { tasks, persistence })
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Add a task from user text. Blank text is ignored and not persisted.
    pub fn add(&mut self, text: &str) -> Result<Option<Task>> {
        let Some(task) = self.tasks.add(text).cloned() else {
            return Ok(None);
        };
        self.persist()?;
        Ok(Some(task))
    }

    /// Toggle completion; `None` when `id` is unknown.
    pub fn toggle(&mut self, id: &str) -> Result<Option<bool>> {
        let completed = self.tasks.toggle(id);
        self.persist()?;
        Ok(completed)
    }

    /// Delete a task; `None` when `id` is unknown.
    pub fn delete(&mut self, id: &str) -> Result<Option<Task>> {
        let removed = self.tasks.delete(id);
        self.persist()?;
        Ok(removed)
    }

    /// Remove all completed tasks; returns how many were removed.
    pub fn clear_completed(&mut self) -> Result<usize> {
        let removed = self.tasks.clear_completed();
        self.persist()?;
        Ok(removed)
    }

    pub fn all(&self) -> &[Task] {
        self.tasks.all()
    }

    pub fn active_count(&self) -> usize {
        filter::active_count(self.tasks.all())
    }

    pub fn view(&self, filter: Filter) -> ListView<'_> {
        ListView::derive(self.tasks.all(), filter)
    }

    /// See [`TaskList::resolve_id`].
    pub fn resolve_id(&self, input: &str) -> Result<Option<String>> {
        self.tasks.resolve_id(input)
    }

    fn persist(&self) -> Result<()> {
        if let Err(err) = self.persistence.save(self.tasks.all()) {
            tracing::warn!(error = %err, "failed to persist tasks; keeping in-memory state");
            return Err(err);
        }
        Ok(())
    }
}
