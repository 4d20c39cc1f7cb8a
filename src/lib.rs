//! # remind
//!
//! A minimal command-line todo list.
//!
//! This library provides:
//! - The task model: named items with a content fingerprint, kept in an
//!   ordered, duplicate-free list
//! - Pluggable persistence, saved after every change
//! - Table and progress rendering for the terminal
//!
//! ## Flow
//! 1. Load the saved tasks from the store
//! 2. Bind them to a `TaskList` that saves on every mutation
//! 3. Run one command
//! 4. Print the resulting list
//!
//! ## Modules
//! - `task`: `Task`, `TaskList`, filters and errors
//! - `store`: `TaskStore` trait with file and in-memory backends
//! - `render`: task tables and progress bars
//! - `cli` / `commands`: the `rmnd` command line

pub mod cli;
pub mod commands;
pub mod config;
pub mod prompt;
pub mod render;
pub mod store;
pub mod task;
pub mod util;

pub use config::Config;
pub use store::{FileTaskStore, InMemoryTaskStore, TaskStore};
pub use task::{Filter, Task, TaskError, TaskList};
