//! Session scan log models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ExtractedRecord;

/// A single scanned parcel in a session.
///
/// Immutable once created; owned exclusively by the active session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanItem {
    /// Short unit code shown to the operator and on the manifest.
    pub id: String,
    /// Tracking identifier from the label.
    pub tracking_id: String,
    /// Recipient name from the label.
    pub recipient_name: String,
    /// Delivery address text with the PIN suffix.
    pub address: String,
    /// When the item was logged.
    pub timestamp: DateTime<Utc>,
    /// Routing mismatch warning, present iff reconciliation flagged the address.
    pub warning: Option<String>,
}

impl ScanItem {
    /// Build a scan item from an extraction record, deriving the short unit
    /// code and capturing the log timestamp.
    pub fn from_record(record: &ExtractedRecord) -> Self {
        let address = format!(
            "{} (PIN: {})",
            non_empty(&record.address, "NO ADDRESS"),
            non_empty(&record.pincode, "000000"),
        );
        Self {
            id: short_code(),
            tracking_id: non_empty(&record.tracking_id, "N/A"),
            recipient_name: non_empty(&record.recipient_name, "UNKNOWN"),
            address,
            timestamp: Utc::now(),
            warning: record.warning.clone(),
        }
    }
}

/// A finalized scanning session.
///
/// Items are sorted at finalize time and never reordered afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Session identifier derived from the finalize clock.
    pub id: String,
    /// Earliest item timestamp in the session.
    pub start_time: DateTime<Utc>,
    /// When the session was finalized.
    pub end_time: DateTime<Utc>,
    /// Scan items in manifest order: warned first, then newest first.
    pub items: Vec<ScanItem>,
    /// Operator the manifest is stamped with.
    pub operator_name: String,
}

impl Manifest {
    /// Number of items carrying a routing warning.
    pub fn warned_count(&self) -> usize {
        self.items.iter().filter(|i| i.warning.is_some()).count()
    }
}

/// Six-character uppercase unit code.
fn short_code() -> String {
    let simple = Uuid::new_v4().simple().to_string();
    simple[..6].to_uppercase()
}

fn non_empty(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(address: &str, pincode: &str) -> ExtractedRecord {
        ExtractedRecord {
            tracking_id: "TRK123".to_string(),
            recipient_name: "A. Kumar".to_string(),
            address: address.to_string(),
            pincode: pincode.to_string(),
            is_valid: true,
            warning: None,
            error: None,
        }
    }

    #[test]
    fn test_from_record_appends_pin_suffix() {
        let item = ScanItem::from_record(&record("12 MG Road, Bangalore", "560001"));
        assert_eq!(item.address, "12 MG Road, Bangalore (PIN: 560001)");
        assert_eq!(item.tracking_id, "TRK123");
        assert!(item.warning.is_none());
    }

    #[test]
    fn test_from_record_fills_unreadable_fields() {
        let mut blank = record("", "");
        blank.tracking_id = String::new();
        blank.recipient_name = "  ".to_string();
        let item = ScanItem::from_record(&blank);
        assert_eq!(item.tracking_id, "N/A");
        assert_eq!(item.recipient_name, "UNKNOWN");
        assert_eq!(item.address, "NO ADDRESS (PIN: 000000)");
    }

    #[test]
    fn test_short_codes_are_six_uppercase_chars() {
        let a = short_code();
        let b = short_code();
        assert_eq!(a.len(), 6);
        assert!(a.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_warned_count() {
        let mut warned = ScanItem::from_record(&record("addr", "110001"));
        warned.warning = Some("MISMATCH: PIN 110001 IS New Delhi, Delhi".to_string());
        let clean = ScanItem::from_record(&record("addr", "110001"));
        let manifest = Manifest {
            id: "B000001".to_string(),
            start_time: Utc::now(),
            end_time: Utc::now(),
            items: vec![warned, clean],
            operator_name: "R. Singh".to_string(),
        };
        assert_eq!(manifest.warned_count(), 1);
    }
}
