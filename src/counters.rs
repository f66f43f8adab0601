//! Client-local counters.
//!
//! Values live in a flat string key-value store, read at start-up and written
//! on every change. There is no cross-process coordination; two writers race
//! on read-increment-write and the last one wins.

use anyhow::{Context, Result};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

pub const SITE_VIEWS: &str = "site_views";
pub const RESUME_CLICKS: &str = "resume_clicks";
pub const SIDEBAR_COLLAPSED: &str = "sidebar_collapsed";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    /// Returns an error if the value cannot be persisted.
    fn set(&mut self, key: &str, value: String) -> Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// JSON object on disk; a missing file reads as empty.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("Invalid state file: {}", path.display()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to read {}", path.display()))
            }
        };

        debug!("loaded {} keys from {}", values.len(), path.display());

        Ok(Self { path, values })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        let raw = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

pub struct Counters<S> {
    store: S,
}

impl<S: KeyValueStore> Counters<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn read(&self, key: &str) -> u64 {
        self.store
            .get(key)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }

    fn bump(&mut self, key: &str) -> Result<u64> {
        let next = self.read(key).saturating_add(1);
        self.store.set(key, next.to_string())?;
        Ok(next)
    }

    #[must_use]
    pub fn views(&self) -> u64 {
        self.read(SITE_VIEWS)
    }

    #[must_use]
    pub fn resume_clicks(&self) -> u64 {
        self.read(RESUME_CLICKS)
    }

    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn record_view(&mut self) -> Result<u64> {
        self.bump(SITE_VIEWS)
    }

    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn record_resume_click(&mut self) -> Result<u64> {
        self.bump(RESUME_CLICKS)
    }

    #[must_use]
    pub fn sidebar_collapsed(&self) -> bool {
        self.store
            .get(SIDEBAR_COLLAPSED)
            .is_some_and(|raw| raw.trim() == "true")
    }

    /// # Errors
    /// Returns an error if the store cannot be written.
    pub fn set_sidebar_collapsed(&mut self, collapsed: bool) -> Result<()> {
        self.store.set(SIDEBAR_COLLAPSED, collapsed.to_string())
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero_and_increment() {
        let mut counters = Counters::new(MemoryStore::default());
        assert_eq!(counters.views(), 0);
        assert_eq!(counters.record_view().unwrap(), 1);
        assert_eq!(counters.record_view().unwrap(), 2);
        assert_eq!(counters.record_resume_click().unwrap(), 1);
        assert_eq!(counters.views(), 2);
        assert_eq!(counters.resume_clicks(), 1);
    }

    #[test]
    fn garbage_values_read_as_zero() {
        let mut store = MemoryStore::default();
        store.set(SITE_VIEWS, "NaN".to_string()).unwrap();
        store.set(SIDEBAR_COLLAPSED, "yes".to_string()).unwrap();
        let mut counters = Counters::new(store);
        assert_eq!(counters.views(), 0);
        assert!(!counters.sidebar_collapsed());
        assert_eq!(counters.record_view().unwrap(), 1);
    }

    #[test]
    fn saturates_instead_of_wrapping() {
        let mut store = MemoryStore::default();
        store.set(RESUME_CLICKS, u64::MAX.to_string()).unwrap();
        let mut counters = Counters::new(store);
        assert_eq!(counters.record_resume_click().unwrap(), u64::MAX);
    }

    #[test]
    fn file_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut counters = Counters::new(FileStore::open(&path).unwrap());
        counters.record_view().unwrap();
        counters.set_sidebar_collapsed(true).unwrap();

        let counters = Counters::new(FileStore::open(&path).unwrap());
        assert_eq!(counters.views(), 1);
        assert!(counters.sidebar_collapsed());

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains(r#""site_views": "1""#));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "not json").unwrap();
        assert!(FileStore::open(&path).is_err());
    }
}
