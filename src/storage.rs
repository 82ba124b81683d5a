//! JSON-file stores for the working session and manifest archive.
//!
//! The aggregation logic talks to these through ports so it stays free of
//! storage concerns and independently testable.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{Manifest, ScanItem};

/// Store failures surfaced to the operator.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("store I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("store serialization failure: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Snapshot port for the in-flight session.
///
/// Saved after every append so an interrupted session can resume; cleared
/// at finalize.
pub trait WorkingSessionStore: Send + Sync {
    fn save(&self, items: &[ScanItem]) -> Result<(), StorageError>;
    fn load(&self) -> Result<Vec<ScanItem>, StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// History of finalized manifests, most-recent-first.
pub trait ArchiveStore: Send + Sync {
    fn push(&self, manifest: &Manifest) -> Result<(), StorageError>;
    fn list(&self) -> Result<Vec<Manifest>, StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// Working-session snapshot as a single JSON file, overwritten on save.
pub struct JsonSessionStore {
    path: PathBuf,
}

impl JsonSessionStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("session.json"),
        }
    }
}

impl WorkingSessionStore for JsonSessionStore {
    fn save(&self, items: &[ScanItem]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(items)?)?;
        Ok(())
    }

    fn load(&self) -> Result<Vec<ScanItem>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&fs::read(&self.path)?)?)
    }

    fn clear(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Manifest history as a single JSON file, newest first.
pub struct JsonArchiveStore {
    path: PathBuf,
}

impl JsonArchiveStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("history.json"),
        }
    }
}

impl ArchiveStore for JsonArchiveStore {
    fn push(&self, manifest: &Manifest) -> Result<(), StorageError> {
        let mut manifests = self.list()?;
        manifests.insert(0, manifest.clone());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(&manifests)?)?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<Manifest>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&fs::read(&self.path)?)?)
    }

    fn clear(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
