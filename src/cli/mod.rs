//! Command-line interface for nebula
//!
//! This module defines the CLI structure using clap derive macros.
//! Command implementations live in `task`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;

mod init;
mod task;

/// nebula - a small local to-do list
///
/// Add, complete, delete and filter short text tasks. The list is kept in
/// a local slot file and rewritten after every change.
#[derive(Parser, Debug)]
#[command(name = "nebula")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the task slot (defaults to the platform data dir)
    #[arg(long, global = true, env = "NEBULA_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Path to nebula.toml (defaults to the platform config dir)
    #[arg(long, global = true, env = "NEBULA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Keep tasks in memory only; nothing is read or written
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default nebula.toml and create the data directory
    Init,

    /// Add a task (words are joined with spaces)
    Add {
        /// Task text
        #[arg(required = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// List tasks
    #[command(alias = "ls")]
    List {
        /// Filter: all, active, completed
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Mark a task completed, or reopen it
    Toggle {
        /// Task id or unique id prefix
        id: String,
    },

    /// Delete a task
    #[command(alias = "delete")]
    Rm {
        /// Task id or unique id prefix
        id: String,
    },

    /// Remove all completed tasks
    Clear,

    /// Print the number of tasks left to do
    Count,

    /// Interactive task list
    Tui {
        /// Initial filter: all, active, completed
        #[arg(short, long)]
        filter: Option<String>,
    },
}

impl Cli {
    /// Execute the parsed command
    pub fn run(self) -> Result<()> {
        let global = task::GlobalOptions {
            data_dir: self.data_dir,
            config: self.config,
            ephemeral: self.ephemeral,
            json: self.json,
            quiet: self.quiet,
        };
        match self.command {
            Commands::Init => init::run(global),
            Commands::Add { text } => task::run_add(task::AddOptions { text, global }),
            Commands::List { filter } => task::run_list(task::ListOptions { filter, global }),
            Commands::Toggle { id } => task::run_toggle(task::IdOptions { id, global }),
            Commands::Rm { id } => task::run_delete(task::IdOptions { id, global }),
            Commands::Clear => task::run_clear(global),
            Commands::Count => task::run_count(global),
            Commands::Tui { filter } => task::run_tui(task::ListOptions { filter, global }),
        }
    }
}
