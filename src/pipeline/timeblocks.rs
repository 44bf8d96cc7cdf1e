use crate::constants::{weekday_rank, DROPDOWN_INSTRUCTION_TEXT, TIMEBLOCK_KEY_COLUMN};
use crate::pipeline::rows::normalize_row;
use crate::pipeline::slug::slugify;
use crate::types::{DropReason, RawRow, Record, Row, RowOutcome};
use serde_json::{json, Value};
use tracing::debug;

/// Runs the timeblock pipeline: normalize, filter out blank/instruction
/// rows, derive the slug key, sort day-major then start-time-minor, and
/// assign a dense 1-based display order.
pub fn run_timeblock_pipeline(raw_rows: &[RawRow]) -> (Vec<Record>, Vec<DropReason>) {
    let mut kept = Vec::new();
    let mut dropped = Vec::new();

    for raw in raw_rows {
        match transform_timeblock_row(normalize_row(raw)) {
            RowOutcome::Kept(record) => kept.push(record),
            RowOutcome::Dropped(reason) => {
                debug!("Dropping timeblock row: {}", reason.as_str());
                dropped.push(reason);
            }
        }
    }

    // Stable sort on the composite key, so rows tied on (day, start time)
    // keep their source order
    kept.sort_by_key(|record| {
        (
            weekday_rank(field(record, "day")),
            field(record, "start time").to_string(),
        )
    });

    for (index, record) in kept.iter_mut().enumerate() {
        record.insert("order".to_string(), json!(index + 1));
    }

    (kept, dropped)
}

/// Transforms one normalized timeblock row, or reports why it was dropped.
pub fn transform_timeblock_row(row: Row) -> RowOutcome {
    let day = row.get("day").map(String::as_str).unwrap_or("");
    if day.is_empty() {
        return RowOutcome::Dropped(DropReason::BlankDay);
    }
    if day.contains(DROPDOWN_INSTRUCTION_TEXT) {
        return RowOutcome::Dropped(DropReason::InstructionPlaceholder);
    }
    if row.get("start time").map_or(true, |s| s.is_empty()) {
        return RowOutcome::Dropped(DropReason::BlankStartTime);
    }

    let mut record: Record = row
        .into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect();

    // The auto-generated column holds the display text for the slot; its
    // slug becomes the stable key sessions point at
    if let Some(Value::String(raw_key)) = record.remove(TIMEBLOCK_KEY_COLUMN) {
        record.insert("key".to_string(), Value::String(slugify(&raw_key)));
    }

    RowOutcome::Kept(record)
}

fn field<'a>(record: &'a Record, name: &str) -> &'a str {
    record.get(name).and_then(Value::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(day: &str, start: &str) -> RawRow {
        json!({
            "day": day,
            "start time": start,
            "Auto Generated. Do Not Modify.": format!("{day} ({start})"),
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[test]
    fn blank_and_instruction_rows_are_dropped() {
        let rows = vec![
            raw("", "9am"),
            raw("(select from dropdown)", "9am"),
            raw("Monday", ""),
        ];

        let (kept, dropped) = run_timeblock_pipeline(&rows);

        assert!(kept.is_empty());
        assert_eq!(
            dropped,
            vec![
                DropReason::BlankDay,
                DropReason::InstructionPlaceholder,
                DropReason::BlankStartTime,
            ]
        );
    }

    #[test]
    fn orders_by_day_then_start_time() {
        let rows = vec![
            raw("Tuesday", "10:00"),
            raw("Monday", "14:00"),
            raw("Monday", "09:00"),
        ];

        let (kept, dropped) = run_timeblock_pipeline(&rows);

        assert!(dropped.is_empty());
        let summary: Vec<(&str, &str, u64)> = kept
            .iter()
            .map(|r| {
                (
                    r["day"].as_str().unwrap(),
                    r["start time"].as_str().unwrap(),
                    r["order"].as_u64().unwrap(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Monday", "09:00", 1),
                ("Monday", "14:00", 2),
                ("Tuesday", "10:00", 3),
            ]
        );
    }

    #[test]
    fn auto_generated_column_becomes_slug_key() {
        let rows = vec![raw("Saturday", "10:00")];

        let (kept, _) = run_timeblock_pipeline(&rows);

        assert_eq!(kept[0]["key"], json!("saturday--10-00-"));
        assert!(!kept[0].contains_key("Auto Generated. Do Not Modify."));
    }

    #[test]
    fn ties_keep_source_order() {
        let mut first = raw("Monday", "09:00");
        first.insert("room".to_string(), json!("A"));
        let mut second = raw("Monday", "09:00");
        second.insert("room".to_string(), json!("B"));

        let (kept, _) = run_timeblock_pipeline(&[first, second]);

        assert_eq!(kept[0]["room"], json!("A"));
        assert_eq!(kept[1]["room"], json!("B"));
    }
}
