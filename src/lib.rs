//! nebula - a small local to-do list
//!
//! This library provides the core of the nebula CLI: an ordered task list,
//! the filters used to view it, and a persistence port that mirrors the
//! list into a local key-value slot after every change.
//!
//! # Core Concepts
//!
//! - **Tasks**: short text entries, newest first, toggled between open and completed
//! - **Store**: the in-memory list plus its persistence port
//! - **Slot**: one key in a local key-value store holding the list as JSON
//! - **Filters**: all / active / completed views derived on demand
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `nebula.toml`
//! - `error`: Error types and result aliases
//! - `filter`: View filters and the derived list view
//! - `lock`: File locking and atomic writes
//! - `output`: Human and JSON output for commands
//! - `persistence`: The persistence port and its slot/memory adapters
//! - `storage`: File-backed key-value slots
//! - `store`: Task store wiring the list to persistence
//! - `task`: Task type and list mutations
//! - `ui`: Interactive terminal viewer

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod lock;
pub mod output;
pub mod persistence;
pub mod storage;
pub mod store;
pub mod task;
pub mod ui;

pub use error::{Error, Result};
pub use filter::Filter;
pub use persistence::{MemoryPersistence, SlotPersistence, TaskPersistence};
pub use store::TaskStore;
pub use task::{Task, TaskList};
