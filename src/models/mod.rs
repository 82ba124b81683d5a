//! Data models for pinsort.

mod record;
mod scan;

pub use record::{ExtractedRecord, ExtractionError};
pub use scan::{Manifest, ScanItem};
