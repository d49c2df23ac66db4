//! Persistence port for the task list.
//!
//! `load` tolerates bad data but not bad reads: an absent slot and a slot
//! holding undecodable data both come back as an empty list, the latter with a
//! warning. Corrupt data is dropped, not repaired or backed up. A slot that
//! cannot be read at all (lock timeout, I/O error) is an error, so a caller
//! never saves over tasks it failed to see. `save` overwrites the whole slot
//! and reports failures to the caller.

use std::cell::RefCell;

use crate::error::{Error, Result};
use crate::storage::Storage;
use crate::task::{Task, TaskList};

/// Slot key used when none is configured
pub const DEFAULT_SLOT_KEY: &str = "nebula-tasks";

pub trait TaskPersistence {
    fn load(&self) -> Result<TaskList>;
    fn save(&self, tasks: &[Task]) -> Result<()>;
}

/// Decode a persisted slot value, enforcing the list invariants.
pub fn decode_tasks(raw: &str) -> Result<TaskList> {
    let tasks: Vec<Task> = serde_json::from_str(raw)?;
    TaskList::from_tasks(tasks)
}

pub fn encode_tasks(tasks: &[Task]) -> Result<String> {
    Ok(serde_json::to_string(tasks)?)
}

fn decode_or_discard(key: &str, raw: Option<String>) -> TaskList {
    let Some(raw) = raw else {
        return TaskList::new();
    };
    match decode_tasks(&raw) {
        Ok(list) => list,
        Err(err) => {
            tracing::warn!(key, error = %err, "failed to load tasks; discarding slot contents");
            TaskList::new()
        }
    }
}

/// Tasks persisted in a file-backed [`Storage`] slot.
#[derive(Debug, Clone)]
pub struct SlotPersistence {
    storage: Storage,
    key: String,
}

impl SlotPersistence {
    pub fn new(storage: Storage, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }
}

impl TaskPersistence for SlotPersistence {
    fn load(&self) -> Result<TaskList> {
        match self.storage.get_item(&self.key) {
            Ok(raw) => Ok(decode_or_discard(&self.key, raw)),
            Err(Error::CorruptSlot(reason)) => {
                tracing::warn!(key = %self.key, reason = %reason, "unreadable slot contents; discarding");
                Ok(TaskList::new())
            }
            Err(err) => Err(err),
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        self.storage.set_item(&self.key, &encode_tasks(tasks)?)
    }
}

/// In-process slot, used for `--ephemeral` runs and tests.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    slot: RefCell<Option<String>>,
    fail_writes: bool,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a raw slot value, as if written by an earlier session.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: RefCell::new(Some(raw.into())),
            fail_writes: false,
        }
    }

    /// A slot whose every write fails, like a full disk or quota.
    pub fn read_only() -> Self {
        Self {
            slot: RefCell::new(None),
            fail_writes: true,
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl TaskPersistence for MemoryPersistence {
    fn load(&self) -> Result<TaskList> {
        Ok(decode_or_discard("memory", self.raw()))
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        if self.fail_writes {
            return Err(Error::OperationFailed("task slot is read-only".to_string()));
        }
        *self.slot.borrow_mut() = Some(encode_tasks(tasks)?);
        Ok(())
    }
}

impl<P: TaskPersistence + ?Sized> TaskPersistence for Box<P> {
    fn load(&self) -> Result<TaskList> {
        (**self).load()
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        (**self).save(tasks)
    }
}
