//! Where the current position is kept between runs.
//!
//! The store is the external side of position sync: the app seeds from it at
//! startup and writes to it whenever [`NavigationSync`] owes a write.
//!
//! [`NavigationSync`]: aisle_engine::NavigationSync

use crate::config::project_dirs;
use aisle_engine::PositionParams;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

const STATE_FILENAME: &str = "location.toml";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("saved location {path} is corrupt: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize location: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Persistence for a flat position map.
pub trait PositionStore: Send {
    /// The stored position, or an empty map when nothing is stored.
    fn load(&self) -> Result<PositionParams, StoreError>;

    /// Overwrite whatever is stored.
    fn replace(&mut self, params: &PositionParams) -> Result<(), StoreError>;

    /// Remove the stored position.
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// A TOML file with one string per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<state dir>/location.toml`, falling back to the local data dir on
    /// platforms without a state dir.
    pub fn default_path() -> Option<PathBuf> {
        let dirs = project_dirs()?;
        let dir = dirs.state_dir().unwrap_or_else(|| dirs.data_local_dir());
        Some(dir.join(STATE_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PositionStore for FileStore {
    fn load(&self) -> Result<PositionParams, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                let params = toml::from_str(&text).map_err(|source| StoreError::Parse {
                    path: self.path.clone(),
                    source,
                })?;
                tracing::debug!(path = %self.path.display(), "loaded saved location");
                Ok(params)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(PositionParams::new()),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn replace(&mut self, params: &PositionParams) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }
        let text = toml::to_string(params)?;
        fs::write(&self.path, text).map_err(|err| self.io_error(err))?;
        tracing::trace!(path = %self.path.display(), ?params, "saved location");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }
}

/// In-memory store. Clones share contents, so tests can watch what the app
/// writes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    params: PositionParams,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: PositionParams) -> Self {
        let store = Self::default();
        store.lock().params = params;
        store
    }

    pub fn snapshot(&self) -> PositionParams {
        self.lock().params.clone()
    }

    /// Replace and clear calls seen so far.
    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PositionStore for MemoryStore {
    fn load(&self) -> Result<PositionParams, StoreError> {
        Ok(self.snapshot())
    }

    fn replace(&mut self, params: &PositionParams) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.params = params.clone();
        inner.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.params.clear();
        inner.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> PositionParams {
        [("q", "shoe"), ("category", "mens-shirts"), ("page", "3")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("location.toml"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn replace_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested").join("location.toml"));
        store.replace(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), sample());
    }

    #[test]
    fn clear_removes_file_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("location.toml"));
        store.replace(&sample()).unwrap();
        store.clear().unwrap();
        assert!(!store.path().exists());
        store.clear().unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("location.toml");
        fs::write(&path, "q = [").unwrap();
        let store = FileStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn memory_store_shares_between_clones() {
        let store = MemoryStore::new();
        let mut handle = store.clone();
        handle.replace(&sample()).unwrap();
        assert_eq!(store.snapshot(), sample());
        handle.clear().unwrap();
        assert!(store.snapshot().is_empty());
        assert_eq!(store.writes(), 2);
    }
}
