//! Initial record sets: the built-in seed and JSON record files.

use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::record::AttendanceRecord;

/// The record every fresh engine starts with unless seeding is disabled.
#[must_use]
pub fn seeded_records() -> Vec<AttendanceRecord> {
    vec![AttendanceRecord {
        record_id: "EMP-001-2025-11-03".to_string(),
        employee_id: "EMP-001".to_string(),
        name: "Ana Martínez".to_string(),
        check_in: "2025-11-03T08:54:00".into(),
        check_out: Some("2025-11-03T17:12:00".into()),
    }]
}

/// Load a JSON array of records.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON array of
/// records.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<AttendanceRecord>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::input_file(path, e.to_string()))?;
    let records: Vec<AttendanceRecord> =
        serde_json::from_str(&text).map_err(|e| Error::input_file(path, e.to_string()))?;
    info!(count = records.len(), path = %path.display(), "Loaded records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_records() {
        let records = seeded_records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.record_id, record.key().record_id());
        assert_eq!(record.worked_minutes(), Some(498));
    }

    #[test]
    fn test_load_records_missing_file() {
        let err = load_records("/nonexistent/records.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/records.json"));
    }

    #[test]
    fn test_load_records_from_file() {
        let path = std::env::temp_dir().join(format!("rightontime-records-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"[{"recordId": "EMP-002-2025-11-04", "employeeId": "EMP-002", "name": "Luis",
                "checkIn": "2025-11-04T09:10:00", "checkOut": null}]"#,
        )
        .unwrap();

        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_open());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_records_rejects_non_array() {
        let path = std::env::temp_dir().join(format!("rightontime-bad-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"recordId": "x"}"#).unwrap();

        let err = load_records(&path).unwrap_err();
        assert!(matches!(err, Error::InputFile { .. }));

        std::fs::remove_file(&path).unwrap();
    }
}
