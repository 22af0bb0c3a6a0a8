//! Persisted list of previously searched city names.

use parking_lot::Mutex;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::{ForecastError, Result},
    render::Surface,
};

/// Storage key the history list lives under.
pub const HISTORY_KEY: &str = "searchHistory";

/// Synchronous string-valued key/value storage without expiry.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Keeps values for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A JSON object on disk mapping keys to string values.
///
/// Every call reads or rewrites the whole file; there is no locking between
/// processes.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| {
            ForecastError::Storage(format!("Failed to read {}: {e}", self.path.display()))
        })?;

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            ForecastError::Storage(format!("Failed to parse {}: {e}", self.path.display()))
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ForecastError::Storage(format!(
                    "Failed to create storage directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let json = serde_json::to_string_pretty(&values)
            .map_err(|e| ForecastError::Storage(format!("Failed to serialize storage: {e}")))?;

        fs::write(&self.path, json).map_err(|e| {
            ForecastError::Storage(format!("Failed to write {}: {e}", self.path.display()))
        })
    }
}

/// Ordered, unbounded, duplicate-friendly list of searched cities.
///
/// `append` is an unguarded read-modify-write of the whole list: two appends
/// that read the same list concurrently lose one of the entries.
pub struct SearchHistory {
    store: Box<dyn KeyValueStore>,
}

impl SearchHistory {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored list, or empty if nothing was stored yet.
    pub fn load(&self) -> Result<Vec<String>> {
        match self.store.get(HISTORY_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                ForecastError::Storage(format!("Stored search history is not a list: {e}"))
            }),
            None => Ok(Vec::new()),
        }
    }

    /// Overwrite the stored list.
    pub fn save(&self, cities: &[String]) -> Result<()> {
        let raw = serde_json::to_string(cities)
            .map_err(|e| ForecastError::Storage(format!("Failed to encode search history: {e}")))?;
        self.store.set(HISTORY_KEY, &raw)
    }

    /// Add `city` at the end and redraw the history region from the new list.
    pub fn append(&self, city: &str, surface: &dyn Surface) -> Result<()> {
        let mut cities = self.load()?;
        cities.push(city.to_string());
        self.save(&cities)?;

        tracing::info!(city, entries = cities.len(), "Saved search");
        surface.show_history(&cities);
        Ok(())
    }

    pub fn load_and_render(&self, surface: &dyn Surface) -> Result<Vec<String>> {
        let cities = self.load()?;
        surface.show_history(&cities);
        Ok(cities)
    }
}
