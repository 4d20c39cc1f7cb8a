//! JSON file-based task store.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use super::{StoreError, TaskStore};
use crate::task::Task;

/// Everything kept in one store file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Name used to greet the user
    #[serde(default)]
    pub username: Option<String>,

    /// Saved tasks in list order; `None` until the first save
    #[serde(default)]
    pub tasks: Option<Vec<Task>>,
}

#[derive(Debug)]
pub struct FileTaskStore {
    path: PathBuf,
    snapshot: RefCell<StoreSnapshot>,
}

impl FileTaskStore {
    /// Open the store at `path`, reading it if the file exists.
    ///
    /// # Errors
    /// `StoreError::Corrupt` if the file exists but is not a valid snapshot.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let snapshot = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<StoreSnapshot>(&bytes).map_err(|source| {
                StoreError::Corrupt {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No store file at {}, starting fresh", path.display());
                StoreSnapshot::default()
            }
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path,
            snapshot: RefCell::new(snapshot),
        })
    }

    pub fn username(&self) -> Option<String> {
        self.snapshot.borrow().username.clone()
    }

    /// Change the stored username and persist immediately.
    pub fn set_username(&self, name: impl Into<String>) -> Result<(), StoreError> {
        self.snapshot.borrow_mut().username = Some(name.into());
        self.persist()
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_vec_pretty(&*self.snapshot.borrow())?;
        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, &self.path)?;
        tracing::debug!("Saved store to {}", self.path.display());
        Ok(())
    }
}

impl TaskStore for FileTaskStore {
    fn load(&self) -> Result<Option<Vec<Task>>, StoreError> {
        Ok(self.snapshot.borrow().tasks.clone())
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        self.snapshot.borrow_mut().tasks = Some(tasks.to_vec());
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::open_task_list;

    #[test]
    fn missing_file_loads_as_absent() {
        let temp = tempfile::tempdir().expect("tempdir");
        let store = FileTaskStore::open(temp.path().join("store.rmnd")).unwrap();
        assert!(store.load().unwrap().is_none());
        assert!(store.username().is_none());
    }

    #[test]
    fn saved_tasks_survive_reopen() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("store.rmnd");

        let store = FileTaskStore::open(&path).unwrap();
        {
            let mut list = open_task_list(&store).unwrap();
            list.add(Task::new("Buy milk").unwrap()).unwrap();
            list.add(Task::new("Walk dog").unwrap()).unwrap();
            list.set_status_at(1, true).unwrap();
        }

        let reopened = FileTaskStore::open(&path).unwrap();
        let tasks = reopened.load().unwrap().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].name(), "Buy milk");
        assert!(!tasks[0].status());
        assert!(tasks[1].status());
        assert_eq!(tasks[0], Task::new("Buy milk").unwrap());
    }

    #[test]
    fn username_and_tasks_share_the_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("store.rmnd");

        let store = FileTaskStore::open(&path).unwrap();
        store.set_username("ada").unwrap();
        store.save(&[Task::new("A").unwrap()]).unwrap();

        let reopened = FileTaskStore::open(&path).unwrap();
        assert_eq!(reopened.username().as_deref(), Some("ada"));
        assert_eq!(reopened.load().unwrap().unwrap().len(), 1);
        assert!(!store.tmp_path().exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("store.rmnd");
        fs::write(&path, b"not json").unwrap();

        let err = FileTaskStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn null_tasks_field_loads_as_absent() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("store.rmnd");
        fs::write(&path, br#"{"username": "bob", "tasks": null}"#).unwrap();

        let store = FileTaskStore::open(&path).unwrap();
        assert!(store.load().unwrap().is_none());
        assert_eq!(store.username().as_deref(), Some("bob"));
    }
}
