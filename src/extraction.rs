//! Extraction adapter.
//!
//! Boundary between raw recognition output and session records. Owns PIN
//! normalization and the validity-downgrade policy so no malformed PIN ever
//! reaches the reconciliation engine.

use std::sync::Arc;

use tracing::{error, warn};

use crate::models::{ExtractedRecord, ExtractionError};
use crate::postal::Reconciler;
use crate::recognition::RecognitionClient;
use crate::retry::{with_retry, RetryError, RetryPolicy};

/// Shapes recognition responses into normalized, reconciled records.
pub struct Extractor {
    client: Arc<dyn RecognitionClient>,
    reconciler: Reconciler,
    policy: RetryPolicy,
    credentials_present: bool,
}

impl Extractor {
    pub fn new(
        client: Arc<dyn RecognitionClient>,
        reconciler: Reconciler,
        policy: RetryPolicy,
        credentials_present: bool,
    ) -> Self {
        Self {
            client,
            reconciler,
            policy,
            credentials_present,
        }
    }

    /// Extract a record from one captured label image.
    ///
    /// Returns `None` for unreadable or fatally failed extractions; the
    /// caller re-prompts capture. Failed capture paths that the operator
    /// must hear about come back as records flagged with an error code.
    pub async fn extract(&self, image: &[u8]) -> Option<ExtractedRecord> {
        if !self.credentials_present {
            error!("Recognition API key is missing. Check your environment.");
            return Some(ExtractedRecord::failed(ExtractionError::ConfigError));
        }

        let fields = match with_retry(&self.policy, || self.client.recognize(image)).await {
            Ok(fields) => fields,
            Err(RetryError::Exhausted { attempts }) => {
                warn!("Recognition retry budget exhausted after {} attempts", attempts);
                return Some(ExtractedRecord::failed(ExtractionError::Congestion));
            }
            Err(RetryError::Fatal(err)) => {
                error!("Recognition failed: {}", err);
                return None;
            }
        };

        // Clean the PIN of non-digits that arise from OCR noise
        let pincode: String = fields.pincode.chars().filter(|c| c.is_ascii_digit()).collect();

        let mut is_valid = fields.is_valid;
        if is_valid && pincode.len() != 6 {
            is_valid = false;
        }

        let warning = if is_valid {
            self.reconciler.reconcile(&fields.address, &pincode)
        } else {
            None
        };

        Some(ExtractedRecord {
            tracking_id: fields.tracking_id,
            recipient_name: fields.recipient_name,
            address: fields.address,
            pincode,
            is_valid,
            warning,
            error: None,
        })
    }
}
