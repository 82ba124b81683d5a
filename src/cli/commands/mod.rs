//! CLI command implementations.

mod history;
mod scan;
mod session;

pub use history::{cmd_history_clear, cmd_history_export, cmd_history_list};
pub use scan::cmd_scan;
pub use session::{cmd_finalize, cmd_status};

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;
use crate::extraction::Extractor;
use crate::postal::{Reconciler, StaticDirectory};
use crate::recognition::HttpRecognitionClient;
use crate::services::ScanService;
use crate::storage::{JsonArchiveStore, JsonSessionStore};

/// Wire the scan service from settings: bundled reference tables, HTTP
/// recognition client, and JSON stores under the data directory.
fn build_scan_service(settings: &Settings, export_dir: PathBuf) -> ScanService {
    let credentials_present = settings.recognition.has_credentials();
    let client = Arc::new(HttpRecognitionClient::new(settings.recognition.clone()));
    let reconciler = Reconciler::new(Arc::new(StaticDirectory::bundled()));
    let extractor = Extractor::new(
        client,
        reconciler,
        settings.retry.policy(),
        credentials_present,
    );
    ScanService::new(
        extractor,
        Arc::new(JsonSessionStore::new(&settings.data_dir)),
        Arc::new(JsonArchiveStore::new(&settings.data_dir)),
        export_dir,
    )
}
