//! Session aggregation and finalization.
//!
//! Exactly one aggregator mutates a session. Items accumulate
//! most-recent-first and are re-sorted once at finalize; a finalized
//! manifest is never reordered again.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::export::{self, ExportError};
use crate::models::{ExtractedRecord, Manifest, ScanItem};
use crate::storage::{ArchiveStore, StorageError, WorkingSessionStore};

/// Session-level failures surfaced to the operator.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Finalize attempted with no scanned items. No state change.
    #[error("no scanned items to finalize")]
    EmptySession,
    /// Manifest serialization failed; the session is preserved for retry.
    #[error("manifest export failed: {0}")]
    Export(#[from] ExportError),
    /// Archival failed; the session is preserved for retry.
    #[error("manifest archival failed: {0}")]
    Archive(StorageError),
}

/// In-memory scan log for the active session.
///
/// State machine: Empty, Accumulating on first append, and back to Empty
/// once a finalize succeeds. Nothing can be appended to a finalized
/// manifest; it leaves the aggregator as an immutable value.
pub struct SessionAggregator {
    items: Vec<ScanItem>,
    store: Arc<dyn WorkingSessionStore>,
}

impl SessionAggregator {
    pub fn new(store: Arc<dyn WorkingSessionStore>) -> Self {
        Self {
            items: Vec::new(),
            store,
        }
    }

    /// Resume a previously interrupted session from its snapshot.
    ///
    /// A corrupt or unreadable snapshot is discarded with a warning rather
    /// than blocking the capture path.
    pub fn resume(store: Arc<dyn WorkingSessionStore>) -> Self {
        let mut aggregator = Self::new(store);
        match aggregator.store.load() {
            Ok(items) => aggregator.items = items,
            Err(err) => warn!("Session recovery failed: {}", err),
        }
        if !aggregator.items.is_empty() {
            info!("Resumed working session with {} items", aggregator.items.len());
        }
        aggregator
    }

    /// Items in working order, most recent first.
    pub fn items(&self) -> &[ScanItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Number of items carrying a routing warning.
    pub fn warned_count(&self) -> usize {
        self.items.iter().filter(|i| i.warning.is_some()).count()
    }

    /// Append a record as a new scan item and persist the snapshot.
    ///
    /// Snapshot persistence is best-effort: a failed save degrades resume
    /// but never loses the in-memory item.
    pub fn append(&mut self, record: &ExtractedRecord) -> ScanItem {
        let item = ScanItem::from_record(record);
        self.items.insert(0, item.clone());
        if let Err(err) = self.store.save(&self.items) {
            warn!("Failed to persist session snapshot: {}", err);
        }
        item
    }

    /// Finalize the session: sort, export, archive, clear.
    ///
    /// All-or-nothing from the caller's view. If export or archival fails
    /// the working session is left intact and the error surfaces.
    pub fn finalize(
        &mut self,
        operator_name: &str,
        export_dir: &Path,
        archive: &dyn ArchiveStore,
    ) -> Result<(Manifest, PathBuf), SessionError> {
        if self.items.is_empty() {
            return Err(SessionError::EmptySession);
        }

        let now = Utc::now();
        let manifest = Manifest {
            id: session_id(now),
            start_time: self
                .items
                .iter()
                .map(|i| i.timestamp)
                .min()
                .unwrap_or(now),
            end_time: now,
            items: sorted_for_manifest(&self.items),
            operator_name: operator_name.to_string(),
        };

        let path = export::export_to_dir(&manifest, export_dir)?;
        archive.push(&manifest).map_err(SessionError::Archive)?;

        if let Err(err) = self.store.clear() {
            warn!("Failed to clear session snapshot: {}", err);
        }
        self.items.clear();

        Ok((manifest, path))
    }
}

/// Manifest order: items with a warning before items without, then newest
/// first within each group. The sort is stable.
fn sorted_for_manifest(items: &[ScanItem]) -> Vec<ScanItem> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| {
        b.warning
            .is_some()
            .cmp(&a.warning.is_some())
            .then_with(|| b.timestamp.cmp(&a.timestamp))
    });
    sorted
}

/// Session id derived from the finalize clock.
fn session_id(now: DateTime<Utc>) -> String {
    format!("B{:06}", now.timestamp_millis().rem_euclid(1_000_000))
}
