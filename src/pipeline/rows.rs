use crate::types::{RawRow, Row};
use serde_json::Value;

/// Normalizes a raw worksheet row: drops decorative columns with blank
/// names and coerces every value to its textual representation. Runs before
/// any field-specific logic in both pipelines, since downstream steps
/// (slicing, splitting, substring tests) assume string values.
pub fn normalize_row(raw: &RawRow) -> Row {
    raw.iter()
        .filter(|(name, _)| !name.trim().is_empty())
        .map(|(name, value)| (name.clone(), coerce_to_text(value)))
        .collect()
}

fn coerce_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn drops_blank_column_names_and_stringifies_values() {
        let raw: RawRow = json!({
            "day": "Monday",
            "duration": 45,
            "": "decorative",
            "  ": "also decorative",
            "flag": true
        })
        .as_object()
        .unwrap()
        .clone();

        let row = normalize_row(&raw);

        assert_eq!(row.len(), 3);
        assert_eq!(row["day"], "Monday");
        assert_eq!(row["duration"], "45");
        assert_eq!(row["flag"], "true");
    }

    #[test]
    fn null_becomes_empty_string() {
        let raw: RawRow = json!({ "notes": null }).as_object().unwrap().clone();
        assert_eq!(normalize_row(&raw)["notes"], "");
    }
}
