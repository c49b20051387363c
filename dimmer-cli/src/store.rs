//! File-backed stand-in for the receiver's flash record
//!
//! The record lives in `$DIMMER_HOME/memory.json`. Like flash, a fresh store
//! is seeded with the defaults and reports busy for a few polls while the
//! "write" completes.

use std::cell::Cell;
use std::path::PathBuf;

use dimmer_mcu::storage::{MemoryRecord, RECORD_LEN, Storage};
use log::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("corrupt record in {path}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("record has {0} reserved bytes, expected {expected}", expected = RECORD_LEN - 1)]
    Length(usize),
}

/// On-disk shape of [`MemoryRecord`]
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct StoredRecord {
    fade_percent: u8,
    reserved: Vec<u8>,
}

impl From<&MemoryRecord> for StoredRecord {
    fn from(record: &MemoryRecord) -> Self {
        Self {
            fade_percent: record.fade_percent(),
            reserved: record.reserved().to_vec(),
        }
    }
}

impl TryFrom<StoredRecord> for MemoryRecord {
    type Error = StoreError;

    fn try_from(stored: StoredRecord) -> Result<Self, StoreError> {
        if stored.reserved.len() != RECORD_LEN - 1 {
            return Err(StoreError::Length(stored.reserved.len()));
        }
        let mut bytes = [0u8; RECORD_LEN];
        bytes[0] = stored.fade_percent;
        bytes[1..].copy_from_slice(&stored.reserved);
        Ok(MemoryRecord::from_bytes(bytes))
    }
}

pub struct FileStorage {
    path: PathBuf,
    unavailable: bool,
    busy_polls: u32,
    pending: Cell<u32>,
}

impl FileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            unavailable: false,
            busy_polls: 0,
            pending: Cell::new(0),
        }
    }

    /// Make `init` fail, as a dead flash page would
    pub fn unavailable(mut self, unavailable: bool) -> Self {
        self.unavailable = unavailable;
        self
    }

    /// Report busy for `polls` calls after seeding
    pub fn busy_polls(mut self, polls: u32) -> Self {
        self.busy_polls = polls;
        self
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn load(&self) -> Result<MemoryRecord, StoreError> {
        let data = std::fs::read(&self.path).map_err(|e| self.io_err(e))?;
        let stored: StoredRecord =
            serde_json::from_slice(&data).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        stored.try_into()
    }
}

impl Storage for FileStorage {
    type Error = StoreError;

    fn init(&mut self, defaults: &MemoryRecord) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable);
        }

        if self.path.exists() {
            let record = self.load()?;
            info!("Opened {} (fade {}%)", self.path.display(), record.fade_percent());
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }
        let data = serde_json::to_vec_pretty(&StoredRecord::from(defaults))
            .map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        std::fs::write(&self.path, data).map_err(|e| self.io_err(e))?;
        info!("Seeded {} with defaults", self.path.display());

        self.pending.set(self.busy_polls);
        Ok(())
    }

    fn is_busy(&self) -> bool {
        let pending = self.pending.get();
        if pending == 0 {
            return false;
        }
        self.pending.set(pending - 1);
        true
    }

    fn read(&self) -> Result<MemoryRecord, StoreError> {
        self.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_fresh_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        let mut store = FileStorage::new(path.clone()).busy_polls(2);

        store.init(&MemoryRecord::DEFAULT).unwrap();

        assert!(store.is_busy());
        assert!(store.is_busy());
        assert!(!store.is_busy());
        assert_eq!(store.read().unwrap(), MemoryRecord::DEFAULT);

        let on_disk: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(on_disk["fade_percent"], 10);
        assert_eq!(on_disk["reserved"].as_array().unwrap().len(), 7);
    }

    #[test]
    fn existing_record_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(&path, r#"{"fade_percent": 60, "reserved": [0,0,0,0,0,0,0]}"#).unwrap();
        let mut store = FileStorage::new(path).busy_polls(5);

        store.init(&MemoryRecord::DEFAULT).unwrap();

        assert!(!store.is_busy());
        let record = store.read().unwrap();
        assert_eq!(record.fade_percent(), 60);
        assert_eq!(record.reserved(), &[0; 7]);
    }

    #[test]
    fn corrupt_record_fails_init() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FileStorage::new(path).init(&MemoryRecord::DEFAULT).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn short_record_fails_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(&path, r#"{"fade_percent": 10, "reserved": [255]}"#).unwrap();

        let err = FileStorage::new(path).read().unwrap_err();
        assert!(matches!(err, StoreError::Length(1)));
    }

    #[test]
    fn unavailable_store_fails_init() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        let mut store = FileStorage::new(path.clone()).unavailable(true);

        assert!(matches!(store.init(&MemoryRecord::DEFAULT), Err(StoreError::Unavailable)));
        assert!(!path.exists());
    }
}
