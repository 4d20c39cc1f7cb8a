//! CLI argument definitions using clap.
//!
//! - rmnd                       # Greet and show the current list
//! - rmnd add "Buy milk"        # Append a task
//! - rmnd mark done 1           # Finish task #1
//! - rmnd tasks --filter done   # List a subset

use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::task::Filter;

/// Remind - A Minimal CLI Todo List
#[derive(Parser, Debug)]
#[command(name = "rmnd")]
#[command(version)]
#[command(after_help = HELP_FOOTER)]
pub struct Cli {
    /// Use another file to save (overrides REMIND_STORE)
    #[arg(long, value_name = "PATH", global = true)]
    pub store_path: Option<PathBuf>,

    /// Answer yes to every confirmation
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

const HELP_FOOTER: &str = "\
Command groups:
  Define:   add, delete, clear, remove-done
  Modify:   rename, move, mark
  Display:  tasks, done, pending
  Settings: callme

Task numbers start at 1, as shown in the task table.

Made by the remind contributors.";

fn task_id() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::<usize>::new().range(1..)
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Append a task to the list
    #[command(display_order = 10)]
    Add { name: String },

    /// Delete a task from the list
    #[command(display_order = 11)]
    Delete {
        #[arg(value_parser = task_id())]
        task_id: usize,
    },

    /// Rename a task
    #[command(display_order = 20)]
    Rename {
        #[arg(value_parser = task_id())]
        task_id: usize,
        name: String,
    },

    /// Change task order by swapping two tasks
    #[command(display_order = 21)]
    Move {
        #[arg(value_parser = task_id())]
        old_id: usize,
        #[arg(value_parser = task_id())]
        new_id: usize,
    },

    /// Delete all tasks from the list
    #[command(display_order = 12)]
    Clear,

    /// Delete all finished tasks
    #[command(display_order = 13)]
    RemoveDone,

    /// Change username
    #[command(display_order = 40)]
    Callme { name: String },

    /// Display tasks in the list
    #[command(display_order = 30)]
    Tasks {
        /// Which tasks to show: all, done or pending
        #[arg(long, default_value = "all")]
        filter: Filter,
    },

    /// Display all done tasks
    #[command(display_order = 31)]
    Done,

    /// Display all pending tasks
    #[command(display_order = 32)]
    Pending,

    /// Marking tasks
    #[command(display_order = 22)]
    Mark {
        #[command(subcommand)]
        action: MarkAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum MarkAction {
    /// Mark a task as finished
    Done {
        #[arg(value_parser = task_id())]
        task_id: usize,
    },

    /// Mark a task as unfinished
    Pending {
        #[arg(value_parser = task_id())]
        task_id: usize,
    },

    /// Mark all tasks as finished
    AllDone,

    /// Mark all tasks as unfinished
    AllPending,
}
