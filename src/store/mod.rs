//! Task storage with pluggable backends.
//!
//! Supports:
//! - `memory`: In-memory storage (non-persistent, for testing)
//! - `file`: JSON file-based storage

mod file;
mod memory;

pub use file::{FileTaskStore, StoreSnapshot};
pub use memory::InMemoryTaskStore;

use std::path::PathBuf;

use crate::task::{Task, TaskList};

/// Errors raised while reading or writing a store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store file {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Task store trait - implemented by all storage backends.
pub trait TaskStore {
    /// Load the saved sequence, or `None` if nothing was ever saved.
    fn load(&self) -> Result<Option<Vec<Task>>, StoreError>;

    /// Replace the saved sequence with `tasks`.
    fn save(&self, tasks: &[Task]) -> Result<(), StoreError>;
}

/// Load the tasks from `store` (empty if absent) and bind the list to it.
pub fn open_task_list<S: TaskStore + ?Sized>(store: &S) -> Result<TaskList<'_>, StoreError> {
    let tasks = store.load()?.unwrap_or_default();
    tracing::debug!(count = tasks.len(), "loaded tasks");
    Ok(TaskList::with_store(tasks, store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_task_list_starts_empty_when_nothing_saved() {
        let store = InMemoryTaskStore::new();
        let list = open_task_list(&store).unwrap();
        assert!(list.is_empty());
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn opened_list_saves_after_each_mutation() {
        let store = InMemoryTaskStore::new();
        {
            let mut list = open_task_list(&store).unwrap();
            list.add(Task::new("A").unwrap()).unwrap();
            list.add(Task::new("B").unwrap()).unwrap();
            list.set_status_at(0, true).unwrap();
        }
        assert_eq!(store.save_count(), 3);

        let saved = store.load().unwrap().unwrap();
        assert_eq!(saved.len(), 2);
        assert!(saved[0].status());

        let reopened = open_task_list(&store).unwrap();
        assert_eq!(reopened.len(), 2);
    }
}
