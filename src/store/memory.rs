//! In-memory task store (non-persistent).

use std::cell::{Cell, RefCell};

use super::{StoreError, TaskStore};
use crate::task::Task;

#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RefCell<Option<Vec<Task>>>,
    saves: Cell<usize>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save()` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl TaskStore for InMemoryTaskStore {
    fn load(&self) -> Result<Option<Vec<Task>>, StoreError> {
        Ok(self.tasks.borrow().clone())
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        *self.tasks.borrow_mut() = Some(tasks.to_vec());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
