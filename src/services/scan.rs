//! Scan orchestration service.
//!
//! Serializes capture attempts, feeds extraction results into the session
//! aggregator, and runs finalization against the export and archive ports.
//! Separated from CLI concerns so the capture flow is testable end to end.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::extraction::Extractor;
use crate::models::{ExtractionError, Manifest, ScanItem};
use crate::session::{SessionAggregator, SessionError};
use crate::storage::{ArchiveStore, WorkingSessionStore};

/// Outcome of one capture attempt, for operator status display.
#[derive(Debug)]
pub enum CaptureOutcome {
    /// Item logged; it carries a warning if reconciliation flagged the address.
    Logged(ScanItem),
    /// Retry budget exhausted; the capture path stays usable.
    Congestion,
    /// Recognition credentials missing; fatal for the capture path until fixed.
    ConfigError,
    /// Unreadable or invalid extraction; the operator should re-capture.
    Invalid,
    /// A previous extraction is still in flight.
    Busy,
    /// Capture is paused; no extraction attempts are scheduled.
    Paused,
}

/// Orchestrates the capture-to-session flow for a single operator.
pub struct ScanService {
    extractor: Extractor,
    aggregator: Mutex<SessionAggregator>,
    archive: Arc<dyn ArchiveStore>,
    export_dir: PathBuf,
    scanning: AtomicBool,
}

impl ScanService {
    /// Build the service, resuming any interrupted session snapshot.
    pub fn new(
        extractor: Extractor,
        store: Arc<dyn WorkingSessionStore>,
        archive: Arc<dyn ArchiveStore>,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            extractor,
            aggregator: Mutex::new(SessionAggregator::resume(store)),
            archive,
            export_dir,
            scanning: AtomicBool::new(true),
        }
    }

    /// Stop scheduling extraction attempts. An in-flight wait completes or
    /// is abandoned without touching session state.
    pub fn pause(&self) {
        self.scanning.store(false, Ordering::SeqCst);
    }

    /// Re-enable capture.
    #[allow(dead_code)]
    pub fn resume(&self) {
        self.scanning.store(true, Ordering::SeqCst);
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning.load(Ordering::SeqCst)
    }

    /// Process one capture.
    ///
    /// Captures are serialized: the aggregator lock is held across the
    /// extraction, so a second capture arriving mid-flight is rejected
    /// instead of racing on the items sequence.
    pub async fn capture(&self, image: &[u8]) -> CaptureOutcome {
        if !self.is_scanning() {
            return CaptureOutcome::Paused;
        }
        let mut aggregator = match self.aggregator.try_lock() {
            Ok(guard) => guard,
            Err(_) => return CaptureOutcome::Busy,
        };

        let record = match self.extractor.extract(image).await {
            Some(record) => record,
            None => return CaptureOutcome::Invalid,
        };

        match record.error {
            Some(ExtractionError::ConfigError) => return CaptureOutcome::ConfigError,
            Some(ExtractionError::Congestion) => return CaptureOutcome::Congestion,
            None => {}
        }
        if !record.is_loggable() {
            return CaptureOutcome::Invalid;
        }

        let item = aggregator.append(&record);
        match &item.warning {
            Some(warning) => warn!("Routing warning for unit {}: {}", item.id, warning),
            None => info!("Verified unit {} ({})", item.id, item.tracking_id),
        }
        CaptureOutcome::Logged(item)
    }

    /// Snapshot of the current session items, most recent first.
    pub async fn session_items(&self) -> Vec<ScanItem> {
        self.aggregator.lock().await.items().to_vec()
    }

    /// Finalize the working session into an exported, archived manifest.
    ///
    /// On success capture is paused, matching the end of a scanning run.
    pub async fn finalize(&self, operator_name: &str) -> Result<(Manifest, PathBuf), SessionError> {
        let mut aggregator = self.aggregator.lock().await;
        let result = aggregator.finalize(operator_name, &self.export_dir, self.archive.as_ref());
        if let Ok((manifest, path)) = &result {
            info!(
                "Finalized session {} ({} units, {} warned) -> {}",
                manifest.id,
                manifest.items.len(),
                manifest.warned_count(),
                path.display()
            );
            self.pause();
        }
        result
    }
}
