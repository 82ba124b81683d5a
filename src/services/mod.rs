//! Service layer.

mod scan;

pub use scan::{CaptureOutcome, ScanService};
