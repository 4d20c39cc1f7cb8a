//! Core Task type: a named todo item with a content fingerprint.
//!
//! # Invariants
//! - `name` is never empty or whitespace-only (checked in `new()` and `rename()`)
//! - `added_on` is stamped once at construction and never changes
//! - Two tasks are equal iff their fingerprints are equal; status and
//!   timestamp take no part in equality

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::cell::OnceCell;

use crate::store::StoreError;
use crate::util::is_blank;

/// Number of hex characters shown by [`Fingerprint::short`].
pub const SHORT_FINGERPRINT_LEN: usize = 6;

/// Hex-encoded SHA-256 digest of a task name.
///
/// # Properties
/// - Deterministic: the same name always yields the same fingerprint
/// - Depends on nothing but the name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of `name`.
    pub fn of(name: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form used in listings.
    pub fn short(&self) -> &str {
        &self.0[..SHORT_FINGERPRINT_LEN]
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reject empty and whitespace-only names.
pub fn validate_name(name: &str) -> Result<(), TaskError> {
    if is_blank(name) {
        return Err(TaskError::InvalidInput(
            "Task name cannot be an empty string!".to_string(),
        ));
    }
    Ok(())
}

/// A single todo item.
///
/// The fingerprint is derived from `name` on first read and cached until the
/// next `rename()`. It is never serialized; a loaded task recomputes it
/// lazily like a fresh one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Display label
    name: String,

    /// `true` once the task is done
    #[serde(default)]
    status: bool,

    /// Creation time
    added_on: DateTime<Local>,

    #[serde(skip)]
    fingerprint: OnceCell<Fingerprint>,
}

impl Task {
    /// Create a pending task stamped with the current local time.
    ///
    /// # Errors
    /// Returns `TaskError::InvalidInput` if `name` is empty or whitespace-only.
    pub fn new(name: impl Into<String>) -> Result<Self, TaskError> {
        Self::with_added_on(name, Local::now())
    }

    /// Create a pending task with an explicit creation time.
    pub fn with_added_on(
        name: impl Into<String>,
        added_on: DateTime<Local>,
    ) -> Result<Self, TaskError> {
        let name = name.into();
        validate_name(&name)?;

        Ok(Self {
            name,
            status: false,
            added_on,
            fingerprint: OnceCell::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> bool {
        self.status
    }

    pub fn added_on(&self) -> DateTime<Local> {
        self.added_on
    }

    /// Fingerprint of the current name, computed on demand.
    pub fn fingerprint(&self) -> &Fingerprint {
        self.fingerprint.get_or_init(|| Fingerprint::of(&self.name))
    }

    /// Replace the name and drop the cached fingerprint.
    ///
    /// # Errors
    /// Returns `TaskError::InvalidInput` if `name` is empty or whitespace-only;
    /// the task is left untouched in that case.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), TaskError> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        self.fingerprint = OnceCell::new();
        Ok(())
    }

    pub fn set_status(&mut self, status: bool) {
        self.status = status;
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint() == other.fingerprint()
    }
}

impl Eq for Task {}

/// Errors that can occur during task and task list operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Task index {index} is out of range (list has {len} tasks)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Task \"{0}\" already exists")]
    DuplicateTask(String),

    #[error("Unknown filter '{0}': must be all, done or pending")]
    InvalidFilter(String),

    #[error("Failed to save tasks: {0}")]
    Persist(#[from] StoreError),
}
