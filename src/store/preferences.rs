//! Preference stores backed by JSON files or memory

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Key of the persisted theme mode
pub const THEME_MODE_KEY: &str = "theme-mode";

/// Key of the persisted last viewed location
pub const LAST_LOCATION_KEY: &str = "last-location";

/// Errors raised while persisting preferences
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("preference I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Key/value preference storage
pub trait PreferenceStore {
    /// Returns the stored value, `None` when absent or unreadable
    fn load(&self, key: &str) -> Option<Value>;

    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Reads and decodes a typed preference
pub fn read_value<T: DeserializeOwned, S: PreferenceStore + ?Sized>(store: &S, key: &str) -> Option<T> {
    let value = store.load(key)?;
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            debug!(key, %err, "ignoring undecodable preference");
            None
        }
    }
}

/// Encodes and stores a typed preference
pub fn write_value<T: Serialize, S: PreferenceStore + ?Sized>(
    store: &mut S,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    store.save(key, serde_json::to_value(value)?)
}

/// Wrapper struct for a preference stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct PreferenceEntry {
    value: Value,
    saved_at: DateTime<Utc>,
}

/// Stores each preference as `<key>.json` in a per-user config directory
///
/// Uses `~/.config/weatherdash/` on Linux, or the platform equivalent.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    dir: PathBuf,
}

impl FilePreferenceStore {
    /// Returns `None` if no home directory can be determined
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "weatherdash")?;
        Some(Self {
            dir: project_dirs.config_dir().to_path_buf(),
        })
    }

    /// Creates a store rooted at a custom directory
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self, key: &str) -> Option<Value> {
        let content = fs::read_to_string(self.path(key)).ok()?;
        let entry: PreferenceEntry = serde_json::from_str(&content).ok()?;
        Some(entry.value)
    }

    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let entry = PreferenceEntry {
            value,
            saved_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&entry)?;
        fs::write(self.path(key), json)?;
        Ok(())
    }
}

/// In-memory store for tests and sessions without a home directory
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: HashMap<String, Value>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn load(&self, key: &str) -> Option<Value> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        (**self).save(key, value)
    }
}
