//! nebula task command implementations.

use std::path::PathBuf;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::persistence::{MemoryPersistence, SlotPersistence, TaskPersistence};
use crate::storage::{self, Storage};
use crate::store::TaskStore;
use crate::task::Task;

const SHORT_ID_LEN: usize = 8;

pub struct GlobalOptions {
    pub data_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub ephemeral: bool,
    pub json: bool,
    pub quiet: bool,
}

impl GlobalOptions {
    pub(super) fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }
}

pub struct AddOptions {
    pub text: Vec<String>,
    pub global: GlobalOptions,
}

pub struct ListOptions {
    pub filter: Option<String>,
    pub global: GlobalOptions,
}

pub struct IdOptions {
    pub id: String,
    pub global: GlobalOptions,
}

type DynStore = TaskStore<Box<dyn TaskPersistence>>;

struct TaskContext {
    store: DynStore,
    config: Config,
}

fn load_context(global: &GlobalOptions) -> Result<TaskContext> {
    let config = Config::resolve(global.config.as_deref())?;
    let persistence: Box<dyn TaskPersistence> = if global.ephemeral {
        Box::new(MemoryPersistence::new())
    } else {
        let data_dir = resolve_data_dir(global, &config)?;
        let storage = Storage::new(data_dir).with_lock_timeout(config.storage.lock_timeout_ms);
        Box::new(SlotPersistence::new(storage, config.storage.key.clone()))
    };
    Ok(TaskContext {
        store: TaskStore::open(persistence)?,
        config,
    })
}

/// `--data-dir` / `NEBULA_DATA_DIR`, then `storage.dir`, then the platform default.
pub(super) fn resolve_data_dir(global: &GlobalOptions, config: &Config) -> Result<PathBuf> {
    match (&global.data_dir, &config.storage.dir) {
        (Some(dir), _) => Ok(dir.clone()),
        (None, Some(dir)) => Ok(dir.clone()),
        (None, None) => storage::default_data_dir(),
    }
}

fn resolve_filter(raw: Option<&str>, config: &Config) -> Result<Filter> {
    match raw {
        Some(raw) => raw.parse(),
        None => Ok(config.view.default_filter),
    }
}

fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

fn task_line(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    format!("[{}] {} {}", mark, short_id(&task.id), task.text)
}

#[derive(serde::Serialize)]
struct TaskAddOutput {
    created: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<Task>,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let mut ctx = load_context(&options.global)?;
    let text = options.text.join(" ");
    let created = ctx.store.add(&text)?;

    let human = match &created {
        Some(task) => {
            let mut human = HumanOutput::new("Task added");
            human.push_summary("ID", task.id.clone());
            human.push_summary("Text", task.text.clone());
            if let Some(created) = task.created_at_utc() {
                human.push_summary(
                    "Created",
                    created
                        .with_timezone(&chrono::Local)
                        .format("%Y-%m-%d %H:%M")
                        .to_string(),
                );
            }
            human.push_footer(format!("{} items left", ctx.store.active_count()));
            human
        }
        None => HumanOutput::new("Nothing added (task text is empty)"),
    };
    let output = TaskAddOutput {
        created: created.is_some(),
        task: created,
    };

    emit_success(options.global.output(), "add", &output, Some(&human))
}

#[derive(serde::Serialize)]
struct TaskListOutput<'a> {
    filter: Filter,
    total: usize,
    active_count: usize,
    tasks: Vec<&'a Task>,
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = load_context(&options.global)?;
    let filter = resolve_filter(options.filter.as_deref(), &ctx.config)?;
    let view = ctx.store.view(filter);

    let mut human = HumanOutput::new("Tasks");
    human.push_summary("Filter", filter.to_string());
    for task in &view.tasks {
        human.push_detail(task_line(task));
    }
    if let Some(message) = view.empty_message() {
        human.push_footer(message);
    }
    human.push_footer(view.items_left_label());
    if view.has_completed {
        human.push_footer("Clear completed: nebula clear");
    }

    let output = TaskListOutput {
        filter,
        total: view.total,
        active_count: view.active_count,
        tasks: view.tasks.clone(),
    };

    emit_success(options.global.output(), "list", &output, Some(&human))
}

/// Resolve user input to a full id; unmatched input passes through
/// unchanged so the store treats it as a no-op.
fn resolve_target(store: &DynStore, input: &str) -> Result<String> {
    Ok(store
        .resolve_id(input)?
        .unwrap_or_else(|| input.trim().to_string()))
}

fn no_match_warning(input: &str) -> String {
    format!("no task id starts with '{}'; nothing changed", input.trim())
}

#[derive(serde::Serialize)]
struct TaskToggleOutput {
    id: String,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed: Option<bool>,
}

pub fn run_toggle(options: IdOptions) -> Result<()> {
    let mut ctx = load_context(&options.global)?;
    let id = resolve_target(&ctx.store, &options.id)?;
    let completed = ctx.store.toggle(&id)?;

    let header = match completed {
        Some(true) => "Task completed",
        Some(false) => "Task reopened",
        None => "No matching task",
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("ID", id.clone());
    match completed {
        Some(_) => human.push_footer(format!("{} items left", ctx.store.active_count())),
        None => human.push_warning(no_match_warning(&options.id)),
    }

    let output = TaskToggleOutput {
        id,
        found: completed.is_some(),
        completed,
    };
    emit_success(options.global.output(), "toggle", &output, Some(&human))
}

#[derive(serde::Serialize)]
struct TaskDeleteOutput {
    id: String,
    deleted: bool,
}

pub fn run_delete(options: IdOptions) -> Result<()> {
    let mut ctx = load_context(&options.global)?;
    let id = resolve_target(&ctx.store, &options.id)?;
    let removed = ctx.store.delete(&id)?;

    let mut human = HumanOutput::new(if removed.is_some() {
        "Task deleted"
    } else {
        "No matching task"
    });
    human.push_summary("ID", id.clone());
    match &removed {
        Some(task) => human.push_summary("Text", task.text.clone()),
        None => human.push_warning(no_match_warning(&options.id)),
    }

    let output = TaskDeleteOutput {
        id,
        deleted: removed.is_some(),
    };
    emit_success(options.global.output(), "rm", &output, Some(&human))
}

#[derive(serde::Serialize)]
struct TaskClearOutput {
    removed: usize,
    remaining: usize,
}

pub fn run_clear(global: GlobalOptions) -> Result<()> {
    let mut ctx = load_context(&global)?;
    let removed = ctx.store.clear_completed()?;

    let mut human = HumanOutput::new("Cleared completed tasks");
    human.push_summary("Removed", removed.to_string());
    human.push_summary("Remaining", ctx.store.all().len().to_string());

    let output = TaskClearOutput {
        removed,
        remaining: ctx.store.all().len(),
    };
    emit_success(global.output(), "clear", &output, Some(&human))
}

#[derive(serde::Serialize)]
struct TaskCountOutput {
    active: usize,
    total: usize,
}

pub fn run_count(global: GlobalOptions) -> Result<()> {
    let ctx = load_context(&global)?;
    let output = TaskCountOutput {
        active: ctx.store.active_count(),
        total: ctx.store.all().len(),
    };

    let human = HumanOutput::new(output.active.to_string());
    emit_success(global.output(), "count", &output, Some(&human))
}

pub fn run_tui(options: ListOptions) -> Result<()> {
    if options.global.json {
        return Err(Error::InvalidArgument(
            "task TUI does not support --json".to_string(),
        ));
    }
    if options.global.quiet {
        return Err(Error::InvalidArgument(
            "task TUI does not support --quiet".to_string(),
        ));
    }
    let ctx = load_context(&options.global)?;
    let filter = resolve_filter(options.filter.as_deref(), &ctx.config)?;
    crate::ui::task_viewer::run(ctx.store, filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_truncates_long_ids_only() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn task_line_marks_completion() {
        let mut task = Task {
            id: "deadbeefcafe".to_string(),
            text: "Buy milk".to_string(),
            completed: false,
            created_at: 0,
        };
        assert_eq!(task_line(&task), "[ ] deadbeef Buy milk");
        task.completed = true;
        assert_eq!(task_line(&task), "[x] deadbeef Buy milk");
    }

    #[test]
    fn filter_falls_back_to_config_default() {
        let mut config = Config::default();
        config.view.default_filter = Filter::Completed;
        assert_eq!(resolve_filter(None, &config).unwrap(), Filter::Completed);
        assert_eq!(resolve_filter(Some("active"), &config).unwrap(), Filter::Active);
        assert!(resolve_filter(Some("later"), &config).is_err());
    }
}
