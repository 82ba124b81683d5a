//! Extraction result models.

use serde::{Deserialize, Serialize};

/// Failure classification attached to an extraction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionError {
    /// Recognition credentials are missing; the capture path is unusable
    /// until the environment is fixed.
    ConfigError,
    /// The retry budget was exhausted against a rate-limited or
    /// unavailable recognition service.
    Congestion,
}

/// A normalized record produced from one recognition response.
///
/// Created once per capture and never mutated afterwards; `warning` is
/// attached during adaptation, before the record leaves the extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// Tracking identifier read off the label.
    pub tracking_id: String,
    /// Recipient name read off the label.
    pub recipient_name: String,
    /// Free-text delivery address.
    pub address: String,
    /// PIN code after non-digit cleanup.
    pub pincode: String,
    /// Whether the recognition result is usable for logging.
    pub is_valid: bool,
    /// Routing mismatch warning from reconciliation, if any.
    pub warning: Option<String>,
    /// Failure flag when the capture path could not produce real fields.
    pub error: Option<ExtractionError>,
}

impl ExtractedRecord {
    /// Record representing a failed capture path.
    pub fn failed(error: ExtractionError) -> Self {
        Self {
            tracking_id: String::new(),
            recipient_name: String::new(),
            address: String::new(),
            pincode: String::new(),
            is_valid: false,
            warning: None,
            error: Some(error),
        }
    }

    /// Whether this record can be appended to the session log.
    pub fn is_loggable(&self) -> bool {
        self.is_valid && self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_record_is_not_loggable() {
        let record = ExtractedRecord::failed(ExtractionError::Congestion);
        assert!(!record.is_loggable());
        assert_eq!(record.error, Some(ExtractionError::Congestion));
        assert!(record.pincode.is_empty());
    }
}
