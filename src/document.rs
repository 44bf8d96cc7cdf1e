use crate::error::Result;
use crate::types::ScheduleDocument;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::path::Path;
use tracing::info;

/// Serializes the document to its canonical byte form: object keys sorted,
/// 4-space indentation, non-ASCII characters left unescaped. The publisher
/// compares these bytes against the previously published version, so the
/// encoding must be deterministic.
pub fn to_canonical_json(document: &ScheduleDocument) -> Result<Vec<u8>> {
    // Round-tripping through Value sorts keys at every level (the default
    // serde_json map is ordered)
    let value = serde_json::to_value(document)?;

    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}

/// Writes the serialized document to a local file.
pub fn write_local(payload: &[u8], path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, payload)?;
    info!("Wrote local artifact to {}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Record;
    use serde_json::{json, Value};

    fn sample_document() -> ScheduleDocument {
        let timeblock: Record = [
            ("key".to_string(), json!("saturday-morning")),
            ("day".to_string(), json!("Saturday")),
            ("start time".to_string(), json!("10:00")),
            ("order".to_string(), json!(1)),
        ]
        .into_iter()
        .collect();

        let session: Record = [
            ("id".to_string(), json!("123")),
            ("title".to_string(), json!("Çatalhöyük & Friends")),
            ("programmatic".to_string(), json!(false)),
            ("category".to_string(), json!(null)),
        ]
        .into_iter()
        .collect();

        ScheduleDocument {
            timeblocks: vec![timeblock],
            sessions: vec![session],
        }
    }

    #[test]
    fn round_trips_structurally() {
        let document = sample_document();
        let payload = to_canonical_json(&document).unwrap();
        let decoded: ScheduleDocument = serde_json::from_slice(&payload).unwrap();
        assert_eq!(decoded, document);
    }

    #[test]
    fn serialization_is_deterministic() {
        let document = sample_document();
        assert_eq!(
            to_canonical_json(&document).unwrap(),
            to_canonical_json(&document).unwrap()
        );
    }

    #[test]
    fn keys_are_sorted_and_indented_four_spaces() {
        let payload = to_canonical_json(&sample_document()).unwrap();
        let text = String::from_utf8(payload).unwrap();

        let sessions_pos = text.find("\"sessions\"").unwrap();
        let timeblocks_pos = text.find("\"timeblocks\"").unwrap();
        assert!(sessions_pos < timeblocks_pos);

        assert!(text.contains("    \"sessions\""));
        let day_pos = text.find("\"day\"").unwrap();
        let order_pos = text.find("\"order\"").unwrap();
        assert!(day_pos < order_pos);
    }

    #[test]
    fn non_ascii_is_not_escaped() {
        let payload = to_canonical_json(&sample_document()).unwrap();
        let text = String::from_utf8(payload).unwrap();
        assert!(text.contains("Çatalhöyük"));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn write_local_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("sessions.json");
        let path = path.to_str().unwrap();

        let payload = to_canonical_json(&sample_document()).unwrap();
        write_local(&payload, path).unwrap();

        let written = std::fs::read(path).unwrap();
        assert_eq!(written, payload);

        let decoded: ScheduleDocument = serde_json::from_slice(&written).unwrap();
        assert_eq!(decoded, sample_document());
    }

    #[test]
    fn write_local_with_existing_parent_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");

        write_local(b"{}", path.to_str().unwrap()).unwrap();
        write_local(b"[]", path.to_str().unwrap()).unwrap();

        assert_eq!(std::fs::read(path).unwrap(), b"[]");
    }

    #[test]
    fn parsed_value_matches_expected_shape() {
        let payload = to_canonical_json(&sample_document()).unwrap();
        let value: Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(value["timeblocks"][0]["order"], json!(1));
        assert_eq!(value["sessions"][0]["category"], json!(null));
    }
}
