//! Durable named scores.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

/// Key the best linear-mode score is stored under.
pub const BEST_SCORE_KEY: &str = "bestScore";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access score file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode scores: {0}")]
    Json(#[from] serde_json::Error),
}

/// A small key-value store for integer scores.
pub trait ScoreStore {
    fn get(&self, key: &str, default: u32) -> u32;
    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError>;
}

/// Keeps scores in memory only. Nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, u32>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: u32) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value);
        store
    }

    /// Number of successful `set` calls.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str, default: u32) -> u32 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.writes += 1;
        Ok(())
    }
}

/// Scores persisted as a JSON object in a single file.
///
/// The file is read once when opened. Each `set` rewrites it through a
/// temporary sibling file followed by a rename.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, u32>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file starts empty; an unreadable
    /// or corrupt one is logged and treated as empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "ignoring corrupt score file");
                BTreeMap::new()
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not read score file");
                BTreeMap::new()
            }
        };

        debug!(path = %path.display(), entries = values.len(), "opened score store");
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.values)?;
        let io_err = |source: io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

impl ScoreStore for JsonFileStore {
    fn get(&self, key: &str, default: u32) -> u32 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn get(&self, key: &str, default: u32) -> u32 {
        (**self).get(key, default)
    }

    fn set(&mut self, key: &str, value: u32) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}
