//! Manifest CSV export.
//!
//! UTF-8 with a leading byte-order mark so spreadsheet tools detect the
//! encoding. One file per finalized session, one row per item in finalized
//! order.

use std::path::{Path, PathBuf};

use crate::models::Manifest;

/// Header row for manifest exports.
pub const MANIFEST_HEADERS: [&str; 6] = [
    "Unit ID/UID",
    "Tracking ID",
    "Recipient Name",
    "Full Address",
    "Timestamp",
    "Routing/Sort Status",
];

/// Status column value for items that passed reconciliation.
pub const VERIFIED: &str = "VERIFIED";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("manifest I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("manifest serialization failure: {0}")]
    Csv(#[from] csv::Error),
}

/// Serialize a finalized manifest as BOM-prefixed CSV.
pub fn manifest_to_csv(manifest: &Manifest) -> Result<Vec<u8>, ExportError> {
    let mut buf: Vec<u8> = "\u{feff}".as_bytes().to_vec();
    let mut writer = csv::WriterBuilder::new().from_writer(&mut buf);
    writer.write_record(MANIFEST_HEADERS)?;
    for item in &manifest.items {
        let timestamp = item.timestamp.to_rfc3339();
        writer.write_record([
            item.id.as_str(),
            item.tracking_id.as_str(),
            item.recipient_name.as_str(),
            item.address.as_str(),
            timestamp.as_str(),
            item.warning.as_deref().unwrap_or(VERIFIED),
        ])?;
    }
    writer.flush()?;
    drop(writer);
    Ok(buf)
}

/// Filename for a session's manifest file.
pub fn manifest_filename(session_id: &str) -> String {
    format!("MANIFEST_{}.csv", session_id)
}

/// Export a manifest into `dir`, returning the written path.
pub fn export_to_dir(manifest: &Manifest, dir: &Path) -> Result<PathBuf, ExportError> {
    let content = manifest_to_csv(manifest)?;
    std::fs::create_dir_all(dir)?;
    let path = dir.join(manifest_filename(&manifest.id));
    std::fs::write(&path, content)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::models::ScanItem;

    fn item(id: &str, name: &str, address: &str, warning: Option<&str>) -> ScanItem {
        ScanItem {
            id: id.to_string(),
            tracking_id: format!("TRK-{}", id),
            recipient_name: name.to_string(),
            address: address.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 5, 10, 2, 0).unwrap(),
            warning: warning.map(str::to_string),
        }
    }

    fn manifest(items: Vec<ScanItem>) -> Manifest {
        Manifest {
            id: "B123456".to_string(),
            start_time: Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 3, 5, 10, 30, 0).unwrap(),
            items,
            operator_name: "R. Singh".to_string(),
        }
    }

    #[test]
    fn test_export_starts_with_bom_and_header() {
        let content = manifest_to_csv(&manifest(vec![item(
            "AB12CD",
            "A. Kumar",
            "Fort, Mumbai (PIN: 400001)",
            None,
        )]))
        .unwrap();
        assert_eq!(&content[..3], [0xEF, 0xBB, 0xBF]);
        let text = String::from_utf8(content[3..].to_vec()).unwrap();
        let first_line = text.lines().next().unwrap();
        assert_eq!(
            first_line,
            "Unit ID/UID,Tracking ID,Recipient Name,Full Address,Timestamp,Routing/Sort Status"
        );
    }

    #[test]
    fn test_round_trip_preserves_fields_and_status() {
        let exported = manifest(vec![
            item(
                "AB12CD",
                "Kumar, Anil \"AK\"",
                "12, MG Road, Bangalore (PIN: 560001)",
                Some("MISMATCH: PIN 560001 IS Bangalore, Karnataka"),
            ),
            item("EF34GH", "S. Rao", "Fort, Mumbai (PIN: 400001)", None),
        ]);
        let content = manifest_to_csv(&exported).unwrap();

        let mut reader = csv::Reader::from_reader(&content[3..]);
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), exported.items.len());

        let first = &rows[0];
        assert_eq!(&first[0], "AB12CD");
        assert_eq!(&first[1], "TRK-AB12CD");
        assert_eq!(&first[2], "Kumar, Anil \"AK\"");
        assert_eq!(&first[3], "12, MG Road, Bangalore (PIN: 560001)");
        assert_eq!(&first[4], exported.items[0].timestamp.to_rfc3339());
        assert_eq!(&first[5], "MISMATCH: PIN 560001 IS Bangalore, Karnataka");

        let second = &rows[1];
        assert_eq!(&second[2], "S. Rao");
        assert_eq!(&second[5], VERIFIED);
    }

    #[test]
    fn test_embedded_quotes_are_doubled_in_output() {
        let content = manifest_to_csv(&manifest(vec![item(
            "AB12CD",
            "Anil \"AK\" Kumar",
            "addr",
            None,
        )]))
        .unwrap();
        let text = String::from_utf8(content[3..].to_vec()).unwrap();
        assert!(text.contains("\"Anil \"\"AK\"\" Kumar\""));
    }

    #[test]
    fn test_export_to_dir_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_to_dir(
            &manifest(vec![item("AB12CD", "A. Kumar", "addr", None)]),
            dir.path(),
        )
        .unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "MANIFEST_B123456.csv"
        );
        assert!(path.exists());
    }

    #[test]
    fn test_manifest_filename() {
        assert_eq!(manifest_filename("B000042"), "MANIFEST_B000042.csv");
    }
}
