//! Terminal user interface.

pub mod task_viewer;
