//! State store for tasktalk
//!
//! Holds one JSON document in memory and writes it through to disk on every
//! mutation. The document is loaded once, at construction.
//!
//! ```text
//! state.json
//!   {
//!     "todos": [ { "id": 1, "title": "Buy Milk", "completed": false } ],
//!     "conversation": [ { "role": "user", "content": "add milk" } ]
//!   }
//! ```
//!
//! Single process, single writer: there is no locking. Writes go through a
//! temp file + rename so readers never see a truncated document.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

/// Default file name for the state document
pub const DEFAULT_STATE_FILE: &str = "state.json";

/// File-backed store for a single JSON document
#[derive(Debug)]
pub struct StateStore<T> {
    path: PathBuf,
    state: T,
}

impl<T> StateStore<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Open the store at `path`, falling back to `default` when the file is
    /// missing or unreadable. Never fails: a bad document is replaced.
    pub fn open(path: impl Into<PathBuf>, default: T) -> Self {
        let path = path.into();
        let state = match read_json::<T>(&path) {
            Ok(Some(state)) => return Self { path, state },
            Ok(None) => {
                tracing::debug!(path = %path.display(), "no state file, using default");
                default
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to read state, using default");
                default
            }
        };

        let store = Self { path, state };
        if let Err(err) = store.save() {
            tracing::warn!(path = %store.path.display(), error = %err, "failed to write default state");
        }
        store
    }

    /// Path to the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current in-memory state. No I/O.
    pub fn get(&self) -> &T {
        &self.state
    }

    /// Replace the whole document and persist it.
    pub fn set(&mut self, state: T) -> Result<()> {
        self.state = state;
        self.save()
    }

    /// Merge fields into the current document and persist it.
    ///
    /// The closure sees the current in-memory document and assigns the fields
    /// it owns; everything else is written back unchanged.
    pub fn update<F>(&mut self, merge: F) -> Result<()>
    where
        F: FnOnce(&mut T),
    {
        let mut next = self.state.clone();
        merge(&mut next);
        self.set(next)
    }

    fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.state)?;
        write_atomic(&self.path, json.as_bytes())
    }
}

/// Read a JSON document. `Ok(None)` when the file does not exist.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let data: T = serde_json::from_str(&content)?;
    Ok(Some(data))
}

/// Atomically write data to a file (temp file in the same directory, then rename).
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = path.with_extension(format!(
        "{}.tmp.{}",
        path.extension().and_then(|e| e.to_str()).unwrap_or(""),
        std::process::id()
    ));

    let mut temp_file = File::create(&temp_path)?;
    temp_file.write_all(data)?;
    temp_file.sync_all()?;
    drop(temp_file);

    fs::rename(&temp_path, path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{AppState, Task};
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn open_missing_file_writes_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");

        let store = StateStore::open(&path, AppState::default());

        assert!(store.get().todos.is_empty());
        assert!(path.exists());
        let raw = fs::read_to_string(&path).unwrap();
        let on_disk: AppState = serde_json::from_str(&raw).unwrap();
        assert_eq!(on_disk, AppState::default());
    }

    #[test]
    fn open_corrupt_file_falls_back_to_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();

        let store = StateStore::open(&path, AppState::default());

        assert_eq!(store.get(), &AppState::default());
        let raw = fs::read_to_string(&path).unwrap();
        assert!(serde_json::from_str::<AppState>(&raw).is_ok());
    }

    #[test]
    fn open_reads_existing_document() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");
        fs::write(
            &path,
            r#"{"todos":[{"id":3,"title":"Walk dog","completed":true}],"conversation":[]}"#,
        )
        .unwrap();

        let store = StateStore::open(&path, AppState::default());

        assert_eq!(
            store.get().todos,
            vec![Task {
                id: 3,
                title: "Walk dog".to_string(),
                completed: true,
            }]
        );
    }

    #[test]
    fn update_keeps_untouched_fields() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("state.json");
        let mut store = StateStore::open(&path, AppState::default());
        store
            .update(|state| state.conversation.push(json!({ "role": "user", "content": "hello" })))
            .unwrap();

        store
            .update(|state| state.todos = vec![Task::new(1, "Buy Milk")])
            .unwrap();

        let reopened = StateStore::open(&path, AppState::default());
        assert_eq!(reopened.get().todos.len(), 1);
        assert_eq!(reopened.get().conversation.len(), 1);
        assert_eq!(reopened.get().conversation[0]["content"], "hello");
    }

    #[test]
    fn set_writes_pretty_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("state.json");
        let mut store = StateStore::open(&path, AppState::default());

        let mut state = AppState::default();
        state.todos.push(Task::new(1, "A"));
        store.set(state).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n  \"todos\""));
        let entries = fs::read_dir(temp.path().join("nested")).unwrap().count();
        assert_eq!(entries, 1);
    }
}
