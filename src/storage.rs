use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::models::Task;

/// Storage key holding the JSON-encoded task list.
pub const TASKS_KEY: &str = "tasks";
/// Storage key holding the JSON-encoded dark theme flag.
pub const DARK_MODE_KEY: &str = "darkMode";

/// Durable string-valued key-value storage.
pub trait KeyValueStore {
    /// Returns `None` when the key has never been written.
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    /// Overwrites the whole value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// Returns the data directory.
///
/// The path is determined in the following order:
/// 1. the explicit `override_dir` (the `--data-dir` flag).
/// 2. `TASKPRO_DATA` environment variable.
/// 3. `~/.local/share/taskpro` (on Linux).
/// 4. `.` (fallback).
pub fn data_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    std::env::var("TASKPRO_DATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| match dirs::data_local_dir() {
            Some(mut p) => {
                p.push("taskpro");
                p
            }
            None => PathBuf::from("."),
        })
}

/// One JSON file per key inside a directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[tracing::instrument(skip(dir))]
    pub fn open(dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
        info!(data_dir = %dir.display(), "opened file store");
        Ok(FileStore { dir: dir.to_path_buf() })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let s = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Some(s))
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.key_path(key);
        debug!(file = %path.display(), bytes = value.len(), "writing key atomically");
        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(value.as_bytes())?;
        temp.flush()?;
        temp.persist(&path)
            .map_err(|err| anyhow!("failed to persist {}: {}", path.display(), err))?;
        Ok(())
    }
}

/// In-memory storage; nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads and decodes a JSON value, treating a missing, unreadable or
/// malformed entry as absent.
fn load_json<T: serde::de::DeserializeOwned>(kv: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match kv.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            let error = format!("{e:#}");
            warn!(key, %error, "failed to read stored value, using default");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(key, error = %e, "stored value is malformed, using default");
            None
        }
    }
}

/// Encodes and writes a JSON value. Failures are logged and dropped.
fn save_json<T: serde::Serialize + ?Sized>(kv: &mut dyn KeyValueStore, key: &str, value: &T) {
    let encoded = match serde_json::to_string(value) {
        Ok(s) => s,
        Err(e) => {
            warn!(key, error = %e, "failed to encode value");
            return;
        }
    };
    if let Err(e) = kv.set(key, &encoded) {
        let error = format!("{e:#}");
        warn!(key, %error, "failed to save value");
    }
}

/// Loads all tasks. Returns an empty vector if nothing usable is stored.
pub fn load_tasks(kv: &dyn KeyValueStore) -> Vec<Task> {
    let tasks: Vec<Task> = load_json(kv, TASKS_KEY).unwrap_or_default();
    info!(count = tasks.len(), "loaded tasks");
    tasks
}

/// Saves the whole task list, overwriting what was stored.
pub fn save_tasks(kv: &mut dyn KeyValueStore, tasks: &[Task]) {
    debug!(count = tasks.len(), "saving tasks");
    save_json(kv, TASKS_KEY, tasks);
}

/// Loads the dark theme flag, defaulting to the light theme.
pub fn load_dark_mode(kv: &dyn KeyValueStore) -> bool {
    load_json(kv, DARK_MODE_KEY).unwrap_or(false)
}

pub fn save_dark_mode(kv: &mut dyn KeyValueStore, dark: bool) {
    debug!(dark, "saving theme flag");
    save_json(kv, DARK_MODE_KEY, &dark);
}
