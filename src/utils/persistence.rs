//! JSON persistence for the best score and user settings.
//!
//! Everything lives in the per-user data directory resolved by the
//! `directories` crate. Callers treat every failure here as non-fatal.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File holding the best score inside [`data_dir`].
pub const BEST_SCORE_FILE: &str = "best_score.json";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("could not determine a data directory for this user")]
    NoDataDir,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Get the data directory, creating it if needed.
pub fn data_dir() -> Result<PathBuf, PersistenceError> {
    let dirs = directories::ProjectDirs::from("", "", "flappy").ok_or(PersistenceError::NoDataDir)?;
    let dir = dirs.data_dir().to_path_buf();
    fs::create_dir_all(&dir).map_err(|source| PersistenceError::Io {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// Load a JSON file, returning `T::default()` if missing or invalid.
pub fn load_json_or_default<T: Default + serde::de::DeserializeOwned>(path: &Path) -> T {
    match fs::read_to_string(path) {
        Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed file");
            T::default()
        }),
        Err(_) => T::default(),
    }
}

/// Save a value as pretty-printed JSON, creating parent directories.
pub fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| PersistenceError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(data).map_err(|source| PersistenceError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Where the best score is kept between runs.
pub trait BestScoreStore {
    /// Stored best, or 0 if nothing has been stored yet.
    fn load(&mut self) -> Result<u32, PersistenceError>;

    fn save(&mut self, best: u32) -> Result<(), PersistenceError>;
}

/// On-disk shape of the best score file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestScoreRecord {
    pub best: u32,
    /// Unix seconds of the last update.
    #[serde(default)]
    pub updated_at: i64,
}

/// Best score stored as JSON on disk.
#[derive(Debug, Clone)]
pub struct JsonBestScoreStore {
    path: PathBuf,
}

impl JsonBestScoreStore {
    /// Store at the default location inside [`data_dir`].
    pub fn new() -> Result<Self, PersistenceError> {
        Ok(Self::at(data_dir()?.join(BEST_SCORE_FILE)))
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BestScoreStore for JsonBestScoreStore {
    fn load(&mut self) -> Result<u32, PersistenceError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(PersistenceError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let record: BestScoreRecord =
            serde_json::from_str(&json).map_err(|source| PersistenceError::Json {
                path: self.path.clone(),
                source,
            })?;
        Ok(record.best)
    }

    fn save(&mut self, best: u32) -> Result<(), PersistenceError> {
        let record = BestScoreRecord {
            best,
            updated_at: chrono::Utc::now().timestamp(),
        };
        save_json(&self.path, &record)
    }
}

/// Best score kept in memory only, for `--ephemeral` runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryBestScoreStore {
    best: u32,
    saves: u32,
}

impl MemoryBestScoreStore {
    pub fn with_best(best: u32) -> Self {
        Self { best, saves: 0 }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> u32 {
        self.saves
    }
}

impl BestScoreStore for MemoryBestScoreStore {
    fn load(&mut self) -> Result<u32, PersistenceError> {
        Ok(self.best)
    }

    fn save(&mut self, best: u32) -> Result<(), PersistenceError> {
        self.best = best;
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_dir() -> PathBuf {
    use std::sync::atomic::{AtomicU64, Ordering};
    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    let test_id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!(
        "flappy-test-{}-{}",
        std::process::id(),
        test_id
    ));
    fs::create_dir_all(&dir).expect("create test dir");
    dir
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_zero() {
        let mut store = JsonBestScoreStore::at(test_dir().join(BEST_SCORE_FILE));
        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = JsonBestScoreStore::at(test_dir().join(BEST_SCORE_FILE));
        store.save(17).unwrap();
        assert_eq!(store.load().unwrap(), 17);

        let json = fs::read_to_string(store.path()).unwrap();
        let record: BestScoreRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record.best, 17);
        assert!(record.updated_at > 0);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let path = test_dir().join("nested").join("deeper").join(BEST_SCORE_FILE);
        let mut store = JsonBestScoreStore::at(path.clone());
        store.save(3).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = test_dir().join(BEST_SCORE_FILE);
        fs::write(&path, "not json").unwrap();
        let mut store = JsonBestScoreStore::at(path);
        assert!(matches!(store.load(), Err(PersistenceError::Json { .. })));
    }

    #[test]
    fn test_record_without_timestamp_loads() {
        let path = test_dir().join(BEST_SCORE_FILE);
        fs::write(&path, r#"{ "best": 12 }"#).unwrap();
        let mut store = JsonBestScoreStore::at(path);
        assert_eq!(store.load().unwrap(), 12);
    }

    #[test]
    fn test_load_json_or_default_missing() {
        let val: Vec<String> = load_json_or_default(&test_dir().join("nope.json"));
        assert!(val.is_empty());
    }

    #[test]
    fn test_json_roundtrip() {
        let path = test_dir().join("list.json");
        let data = vec!["hello".to_string(), "world".to_string()];
        save_json(&path, &data).unwrap();
        let loaded: Vec<String> = load_json_or_default(&path);
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_memory_store_counts_saves() {
        let mut store = MemoryBestScoreStore::with_best(4);
        assert_eq!(store.load().unwrap(), 4);
        store.save(9).unwrap();
        assert_eq!(store.best(), 9);
        assert_eq!(store.save_count(), 1);
    }
}
