//! Minimal persisted key-value store for visitor-local overrides.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::SourceError;

/// String key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), SourceError>;
}

/// In-memory store, used headless and in tests
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), SourceError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// JSON file in the platform data directory holding all keys
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at the default location
    pub fn open_default() -> Result<Self, SourceError> {
        let dirs = directories::ProjectDirs::from("com", "walkthrough", "walkthrough")
            .ok_or(SourceError::NoDataDir)?;
        Self::open(dirs.data_dir().join("storage.json"))
    }

    /// Open a store file; a missing file is an empty store
    pub fn open(path: PathBuf) -> Result<Self, SourceError> {
        let values = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)
                .map_err(|e| SourceError::json(path.display().to_string(), e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(SourceError::io(&path, e)),
        };
        Ok(Self { path, values })
    }

    fn flush(&self) -> Result<(), SourceError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SourceError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(&self.values)
            .map_err(|e| SourceError::json("key-value store", e))?;
        std::fs::write(&self.path, json).map_err(|e| SourceError::io(&self.path, e))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), SourceError> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }
}
