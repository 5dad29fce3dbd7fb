use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::Task;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to save tasks to '{path}': {source}")]
    SaveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize tasks to JSON: {source}")]
    SerializeFailed {
        #[source]
        source: serde_json::Error,
    },

    #[error("Task {0} not found")]
    NotFound(u64),
}

/// Fields the caller supplies when creating a task.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub name: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub has_time: bool,
}

/// The task collection together with the file it is persisted to.
///
/// Mutations only touch memory; call [`TaskStore::save`] to persist them.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Opens the store at `path`.
    ///
    /// A missing, unreadable or malformed file yields an empty collection.
    pub fn open(path: impl Into<PathBuf>) -> TaskStore {
        let path = path.into();
        let tasks = load_tasks(&path);
        debug!(file = %path.display(), count = tasks.len(), "opened task store");
        TaskStore { path, tasks }
    }

    /// Current snapshot, in insertion order.
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Id the next created task receives: one past the largest id, or 0.
    pub fn next_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().map_or(0, |max| max + 1)
    }

    /// Appends a new pending task and returns a copy of it.
    pub fn create(&mut self, new: NewTask, now: DateTime<Utc>) -> Task {
        let task = Task {
            id: self.next_id(),
            name: new.name,
            description: new.description,
            has_time: new.due_date.is_some() && new.has_time,
            due_date: new.due_date,
            is_completed: false,
            completed_at: None,
            created_at: now,
        };
        self.tasks.push(task.clone());
        info!(task_id = task.id, "task created");
        task
    }

    /// Sets the completion status, stamping or clearing `completed_at`.
    ///
    /// Setting the status a task already has leaves it untouched.
    pub fn set_completed(&mut self, id: u64, completed: bool, now: DateTime<Utc>) -> Result<(), StorageError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StorageError::NotFound(id))?;
        if task.is_completed == completed {
            return Ok(());
        }
        if completed {
            task.mark_completed(now);
        } else {
            task.mark_pending();
        }
        info!(task_id = id, completed, "task status changed");
        Ok(())
    }

    /// Flips the completion status and returns the new one.
    pub fn toggle(&mut self, id: u64, now: DateTime<Utc>) -> Result<bool, StorageError> {
        let completed = !self.get(id).ok_or(StorageError::NotFound(id))?.is_completed;
        self.set_completed(id, completed, now)?;
        Ok(completed)
    }

    /// Removes a task and returns it.
    pub fn delete(&mut self, id: u64) -> Result<Task, StorageError> {
        let pos = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(StorageError::NotFound(id))?;
        info!(task_id = id, "task deleted");
        Ok(self.tasks.remove(pos))
    }

    /// Writes the collection to disk, overwriting the existing file.
    pub fn save(&self) -> Result<(), StorageError> {
        save_tasks(&self.path, &self.tasks)
    }
}

/// Loads all tasks from the storage file.
///
/// Returns an empty vector if the file does not exist or cannot be read.
pub fn load_tasks(path: &Path) -> Vec<Task> {
    if !path.exists() {
        return Vec::new();
    }
    let mut f = match OpenOptions::new().read(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            warn!(file = %path.display(), error = %e, "failed to open task file; starting empty");
            return Vec::new();
        }
    };
    let mut s = String::new();
    if let Err(e) = f.read_to_string(&mut s) {
        warn!(file = %path.display(), error = %e, "failed to read task file; starting empty");
        return Vec::new();
    }
    if s.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(&s).unwrap_or_else(|e| {
        warn!(file = %path.display(), error = %e, "malformed task file; starting empty");
        Vec::new()
    })
}

/// Saves the given list of tasks to `path`, creating parent directories.
pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), StorageError> {
    let save_failed = |source| StorageError::SaveFailed { path: path.to_path_buf(), source };
    let s = serde_json::to_string_pretty(tasks).map_err(|source| StorageError::SerializeFailed { source })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(save_failed)?;
    }
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(save_failed)?;
    f.write_all(s.as_bytes()).map_err(save_failed)?;
    debug!(file = %path.display(), count = tasks.len(), "saved tasks");
    Ok(())
}
