//! Task module - the todo item and the ordered list that owns it.
//!
//! This module holds all of the tool's invariants:
//! - Task equality is name-content based (fingerprint)
//! - List uniqueness is enforced on insertion
//! - Every list mutation ends with exactly one change notification

pub mod list;
pub mod task;

pub use list::{ChangeCallback, Filter, FilteredView, TaskList};
pub use task::{validate_name, Fingerprint, Task, TaskError};
