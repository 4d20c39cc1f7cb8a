//! Ordered task collection with index-addressed mutations.
//!
//! # Invariants
//! - No two tasks added through `add()` share a fingerprint. Renames are not
//!   re-checked, so a rename may still produce a collision.
//! - Every mutating call validates all of its preconditions before touching
//!   the sequence, then fires the change callback exactly once.
//! - Indices are 0-based positions in insertion order.

use std::str::FromStr;

use super::task::{validate_name, Task, TaskError};
use crate::store::{StoreError, TaskStore};

/// Hook invoked with the full sequence after every mutation.
pub type ChangeCallback<'a> = Box<dyn FnMut(&[Task]) -> Result<(), StoreError> + 'a>;

/// Status-based task selection shared by counting and listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Done,
    Pending,
}

impl Filter {
    /// The single predicate behind both `count` and `filtered_view`.
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Done => task.status(),
            Filter::Pending => !task.status(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Done => "done",
            Filter::Pending => "pending",
        }
    }
}

impl FromStr for Filter {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Filter::All),
            "done" => Ok(Filter::Done),
            "pending" => Ok(Filter::Pending),
            other => Err(TaskError::InvalidFilter(other.to_string())),
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Borrowed, re-iterable selection of `(index, task)` pairs.
#[derive(Debug, Clone, Copy)]
pub struct FilteredView<'a> {
    tasks: &'a [Task],
    filter: Filter,
}

impl<'a> FilteredView<'a> {
    /// Start a fresh pass over the matching tasks, in list order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a Task)> + Clone + 'a {
        let filter = self.filter;
        let tasks: &'a [Task] = self.tasks;
        tasks
            .iter()
            .enumerate()
            .filter(move |(_, task)| filter.matches(task))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<'a> IntoIterator for &FilteredView<'a> {
    type Item = (usize, &'a Task);
    type IntoIter = Box<dyn Iterator<Item = (usize, &'a Task)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// The task list for one invocation.
pub struct TaskList<'a> {
    tasks: Vec<Task>,
    on_change: Option<ChangeCallback<'a>>,
}

impl<'a> TaskList<'a> {
    /// Wrap a loaded sequence with no change callback.
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            on_change: None,
        }
    }

    /// Wrap a loaded sequence and fire `on_change` after each mutation.
    pub fn with_callback(
        tasks: Vec<Task>,
        on_change: impl FnMut(&[Task]) -> Result<(), StoreError> + 'a,
    ) -> Self {
        Self {
            tasks,
            on_change: Some(Box::new(on_change)),
        }
    }

    /// Wrap a loaded sequence and save it to `store` after each mutation.
    pub fn with_store<S: TaskStore + ?Sized>(tasks: Vec<Task>, store: &'a S) -> Self {
        Self::with_callback(tasks, move |tasks| store.save(tasks))
    }

    fn changed(&mut self) -> Result<(), TaskError> {
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(&self.tasks)?;
        }
        Ok(())
    }

    fn check_index(&self, no: usize) -> Result<(), TaskError> {
        if self.has_task(no) {
            Ok(())
        } else {
            Err(TaskError::IndexOutOfRange {
                index: no,
                len: self.tasks.len(),
            })
        }
    }

    // Queries

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, no: usize) -> Option<&Task> {
        self.tasks.get(no)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn has_task(&self, no: usize) -> bool {
        no < self.tasks.len()
    }

    pub fn is_duplicate(&self, task: &Task) -> bool {
        self.tasks.contains(task)
    }

    pub fn count(&self, filter: Filter) -> usize {
        self.filtered_view(filter).len()
    }

    /// Count by raw filter token.
    pub fn count_by(&self, filter: &str) -> Result<usize, TaskError> {
        Ok(self.count(filter.parse()?))
    }

    pub fn filtered_view(&self, filter: Filter) -> FilteredView<'_> {
        FilteredView {
            tasks: &self.tasks,
            filter,
        }
    }

    /// Filtered view by raw filter token.
    pub fn filtered_view_by(&self, filter: &str) -> Result<FilteredView<'_>, TaskError> {
        Ok(self.filtered_view(filter.parse()?))
    }

    // Mutations

    /// Append `task` to the end of the list.
    ///
    /// # Errors
    /// `DuplicateTask` if a task with the same fingerprint already exists.
    pub fn add(&mut self, task: Task) -> Result<(), TaskError> {
        if self.is_duplicate(&task) {
            return Err(TaskError::DuplicateTask(task.name().to_string()));
        }
        tracing::debug!(name = task.name(), "adding task");
        self.tasks.push(task);
        self.changed()
    }

    /// Remove and return the task at `no`, shifting later tasks left.
    pub fn remove(&mut self, no: usize) -> Result<Task, TaskError> {
        self.check_index(no)?;
        let task = self.tasks.remove(no);
        tracing::debug!(index = no, name = task.name(), "removed task");
        self.changed()?;
        Ok(task)
    }

    /// Exchange the tasks at `old` and `new`.
    pub fn swap(&mut self, old: usize, new: usize) -> Result<(), TaskError> {
        self.check_index(old)?;
        self.check_index(new)?;
        self.tasks.swap(old, new);
        self.changed()
    }

    pub fn rename_at(&mut self, no: usize, name: impl Into<String>) -> Result<(), TaskError> {
        self.change(no, Some(name.into()), None)
    }

    pub fn set_status_at(&mut self, no: usize, status: bool) -> Result<(), TaskError> {
        self.change(no, None, Some(status))
    }

    /// Rename and/or set the status of the task at `no` with a single
    /// change notification.
    ///
    /// # Errors
    /// - `InvalidInput` if neither `name` nor `status` is given, or `name` is blank
    /// - `IndexOutOfRange` if `no` is not a valid position
    pub fn change(
        &mut self,
        no: usize,
        name: Option<String>,
        status: Option<bool>,
    ) -> Result<(), TaskError> {
        if name.is_none() && status.is_none() {
            return Err(TaskError::InvalidInput(
                "Either a name or a status must be given".to_string(),
            ));
        }
        self.check_index(no)?;
        if let Some(name) = name.as_deref() {
            validate_name(name)?;
        }

        let task = &mut self.tasks[no];
        if let Some(name) = name {
            task.rename(name)?;
        }
        if let Some(status) = status {
            task.set_status(status);
        }
        self.changed()
    }

    pub fn mark_all(&mut self, status: bool) -> Result<(), TaskError> {
        for task in &mut self.tasks {
            task.set_status(status);
        }
        self.changed()
    }

    pub fn clear(&mut self) -> Result<(), TaskError> {
        self.tasks.clear();
        self.changed()
    }

    /// Drop every completed task, keeping survivors in order.
    pub fn remove_done(&mut self) -> Result<(), TaskError> {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.status());
        tracing::debug!(removed = before - self.tasks.len(), "removed done tasks");
        self.changed()
    }
}

impl std::fmt::Debug for TaskList<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskList")
            .field("tasks", &self.tasks)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}
