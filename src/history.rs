//! Local assessment history
//!
//! Best-effort persistence of past score records keyed by respondent id.
//! Absence is normal; read failures are treated as "no history".

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::types::{RespondentId, ScoreRecord};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid history JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Respondent id {0} cannot be used as a history key")]
    InvalidId(String),

    #[error("History store lock poisoned")]
    Poisoned,
}

/// One completed assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub completed_at: DateTime<Utc>,
    pub scores: ScoreRecord,
}

impl HistoryEntry {
    pub fn new(scores: ScoreRecord) -> Self {
        Self {
            completed_at: Utc::now(),
            scores,
        }
    }
}

pub trait HistoryStore: Send + Sync {
    /// Past entries for a respondent, oldest first
    fn load(&self, id: &RespondentId) -> Result<Vec<HistoryEntry>, HistoryError>;

    fn append(&self, id: &RespondentId, entry: HistoryEntry) -> Result<(), HistoryError>;
}

impl<T: HistoryStore + ?Sized> HistoryStore for Box<T> {
    fn load(&self, id: &RespondentId) -> Result<Vec<HistoryEntry>, HistoryError> {
        (**self).load(id)
    }

    fn append(&self, id: &RespondentId, entry: HistoryEntry) -> Result<(), HistoryError> {
        (**self).append(id, entry)
    }
}

/// Load history, treating any failure as an empty history
pub fn load_or_empty<H: HistoryStore + ?Sized>(store: &H, id: &RespondentId) -> Vec<HistoryEntry> {
    match store.load(id) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(respondent_id = %id, error = %e, "no usable history, starting fresh");
            Vec::new()
        }
    }
}

/// History kept as `history_<id>.json` files in one directory
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    dir: PathBuf,
}

impl FileHistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that holds a respondent's history
    pub fn path_for(&self, id: &RespondentId) -> Result<PathBuf, HistoryError> {
        let key = id.as_str();
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(HistoryError::InvalidId(key.to_string()));
        }
        Ok(self.dir.join(format!("history_{key}.json")))
    }
}

impl HistoryStore for FileHistoryStore {
    fn load(&self, id: &RespondentId) -> Result<Vec<HistoryEntry>, HistoryError> {
        let path = self.path_for(id)?;
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    fn append(&self, id: &RespondentId, entry: HistoryEntry) -> Result<(), HistoryError> {
        let path = self.path_for(id)?;
        let mut entries = load_or_empty(self, id);
        entries.push(entry);

        fs::create_dir_all(&self.dir)?;
        fs::write(&path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}

/// In-process history
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    entries: Mutex<HashMap<RespondentId, Vec<HistoryEntry>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self, id: &RespondentId) -> Result<Vec<HistoryEntry>, HistoryError> {
        let entries = self.entries.lock().map_err(|_| HistoryError::Poisoned)?;
        Ok(entries.get(id).cloned().unwrap_or_default())
    }

    fn append(&self, id: &RespondentId, entry: HistoryEntry) -> Result<(), HistoryError> {
        let mut entries = self.entries.lock().map_err(|_| HistoryError::Poisoned)?;
        entries.entry(id.clone()).or_default().push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn entry(score: f64) -> HistoryEntry {
        let mut scores = ScoreRecord::default();
        scores.push("sleep", score);
        HistoryEntry::new(scores)
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileHistoryStore::new(dir.path().join("nested"));
        let id = RespondentId::from("user_abc123");

        assert!(store.load(&id).unwrap().is_empty());

        store.append(&id, entry(4.0)).unwrap();
        store.append(&id, entry(7.5)).unwrap();

        let loaded = store.load(&id).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].scores.get("sleep"), Some(7.5));
        assert!(dir.path().join("nested/history_user_abc123.json").exists());
        assert_eq!(store.dir(), dir.path().join("nested").as_path());
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileHistoryStore::new(dir.path());
        let id = RespondentId::from("user_bad");
        fs::write(store.path_for(&id).unwrap(), "{not json").unwrap();

        assert!(matches!(store.load(&id), Err(HistoryError::Json(_))));
        assert!(load_or_empty(&store, &id).is_empty());
    }

    #[test]
    fn test_path_traversal_ids_are_rejected() {
        let store = FileHistoryStore::new("/tmp");
        let id = RespondentId::from("../etc/passwd");
        assert!(matches!(store.path_for(&id), Err(HistoryError::InvalidId(_))));
        assert!(load_or_empty(&store, &id).is_empty());
    }

    #[test]
    fn test_memory_store_is_per_respondent() {
        let store = MemoryHistoryStore::new();
        let a = RespondentId::from("user_a");
        let b = RespondentId::from("user_b");
        store.append(&a, entry(1.0)).unwrap();

        assert_eq!(store.load(&a).unwrap().len(), 1);
        assert!(store.load(&b).unwrap().is_empty());
    }
}
