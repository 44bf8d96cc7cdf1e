use crate::config::ColumnConfig;
use crate::constants::{
    FACILITATOR_COLUMN_PREFIX, PROGRAMMATIC_CATEGORY, SESSION_DURATION_COLUMN,
    SESSION_ID_COLUMN, SESSION_NAME_COLUMN, SESSION_TIMEBLOCK_COLUMN, TAG_SKIP_KEYWORDS,
    WEEKDAYS,
};
use crate::pipeline::rows::normalize_row;
use crate::pipeline::slug::slugify;
use crate::pipeline::timeparse::{parse_time_range, TimeRange};
use crate::types::{DropReason, RawRow, Record, Row, RowOutcome};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Runs the session pipeline over normalized rows. Source row order is
/// preserved; rows failing validation are excluded with their reasons.
pub fn run_session_pipeline(
    raw_rows: &[RawRow],
    columns: &ColumnConfig,
) -> (Vec<Record>, Vec<DropReason>) {
    let mut kept = Vec::new();
    let mut dropped = Vec::new();

    for raw in raw_rows {
        match transform_session_row(normalize_row(raw), columns) {
            RowOutcome::Kept(record) => kept.push(record),
            RowOutcome::Dropped(reason) => {
                debug!("Dropping session row: {}", reason.as_str());
                dropped.push(reason);
            }
        }
    }

    (kept, dropped)
}

/// Transforms one normalized session row through the full step sequence:
/// title and id validation, facilitator grouping, category/tag relabeling,
/// time-range parsing, and the programmatic flag.
pub fn transform_session_row(mut row: Row, columns: &ColumnConfig) -> RowOutcome {
    let mut record = Record::new();

    // `name` column becomes `title`; untitled rows are noise
    let title = row.remove(SESSION_NAME_COLUMN).unwrap_or_default();
    if title.is_empty() {
        return RowOutcome::Dropped(DropReason::MissingTitle);
    }
    record.insert("title".to_string(), Value::String(title));

    // `session id` becomes `id` and must be a single whitespace-free token;
    // multi-word cells are instructional text left in the sheet
    let id = row.remove(SESSION_ID_COLUMN).unwrap_or_default();
    if id.split_whitespace().count() != 1 {
        return RowOutcome::Dropped(DropReason::InvalidId);
    }
    record.insert("id".to_string(), Value::String(id));

    group_facilitators(&mut row, &mut record);

    let category = row.remove(&columns.category_label).unwrap_or_default();

    let raw_tags = row.remove(&columns.tags_label).unwrap_or_default();
    record.insert("tags".to_string(), Value::String(filter_tags(&raw_tags)));

    apply_time_fields(&mut row, &mut record);

    // The sentinel category marks event-wide programmatic content; it is
    // not a real category, so it is nulled out
    let programmatic = category == PROGRAMMATIC_CATEGORY;
    record.insert("programmatic".to_string(), Value::Bool(programmatic));
    record.insert(
        "category".to_string(),
        if programmatic {
            Value::Null
        } else {
            Value::String(category)
        },
    );

    // Remaining columns pass through untouched; transformed keys win on
    // name collisions
    for (name, value) in row {
        record.entry(name).or_insert(Value::String(value));
    }

    RowOutcome::Kept(record)
}

/// Collects `facilitator <N> <metaType>` columns into nested records keyed
/// by the facilitator index, plus a flat name list ordered by index.
/// Columns that carry the prefix but not the expected shape are left on the
/// row as passthrough fields.
fn group_facilitators(row: &mut Row, record: &mut Record) {
    let facilitator_columns: Vec<String> = row
        .keys()
        .filter(|name| name.starts_with(FACILITATOR_COLUMN_PREFIX))
        .cloned()
        .collect();

    let mut facilitators: BTreeMap<u32, serde_json::Map<String, Value>> = BTreeMap::new();
    let mut names: BTreeMap<u32, String> = BTreeMap::new();

    for column in facilitator_columns {
        let Some((index, meta_type)) = parse_facilitator_column(&column) else {
            continue;
        };
        let value = row.remove(&column).unwrap_or_default();
        let entry = facilitators.entry(index).or_default();
        match meta_type {
            FacilitatorMeta::Name => {
                entry.insert("name".to_string(), Value::String(value.clone()));
                names.insert(index, value);
            }
            FacilitatorMeta::Twitter => {
                entry.insert("twitter".to_string(), Value::String(value));
            }
            FacilitatorMeta::Affiliated => {
                entry.insert("affiliated org".to_string(), Value::String(value));
            }
        }
    }

    let grouped: serde_json::Map<String, Value> = facilitators
        .into_iter()
        .map(|(index, fields)| (index.to_string(), Value::Object(fields)))
        .collect();
    record.insert("facilitators".to_string(), Value::Object(grouped));
    record.insert(
        "facilitators_names".to_string(),
        Value::Array(names.into_values().map(Value::String).collect()),
    );
}

#[derive(Debug, Clone, Copy)]
enum FacilitatorMeta {
    Name,
    Twitter,
    Affiliated,
}

fn parse_facilitator_column(column: &str) -> Option<(u32, FacilitatorMeta)> {
    let mut words = column.split(' ');
    words.next()?;
    let index: u32 = words.next()?.parse().ok()?;
    let meta_type = match words.next()? {
        "name" => FacilitatorMeta::Name,
        "twitter" => FacilitatorMeta::Twitter,
        "affiliated" => FacilitatorMeta::Affiliated,
        _ => return None,
    };
    Some((index, meta_type))
}

/// Splits the raw tag cell on commas and drops tokens carrying internal
/// workflow markers, rejoining the survivors.
fn filter_tags(raw_tags: &str) -> String {
    raw_tags
        .split(',')
        .filter(|token| {
            !token
                .to_lowercase()
                .split_whitespace()
                .any(|word| TAG_SKIP_KEYWORDS.contains(&word))
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Pops the free-text `timeblock` cell and derives the slug key, the day,
/// and the 12-hour start/end fields. A failed time parse degrades the time
/// fields to empty strings without dropping the row.
fn apply_time_fields(row: &mut Row, record: &mut Record) {
    let time_data = row.remove(SESSION_TIMEBLOCK_COLUMN).unwrap_or_default();
    record.insert(
        "timeblock".to_string(),
        Value::String(slugify(&time_data)),
    );

    // Later weekday names overwrite earlier matches
    for day in WEEKDAYS {
        if time_data.contains(day) {
            record.insert("day".to_string(), Value::String(day.to_string()));
        }
    }

    if time_data.chars().count() > 1 {
        let duration = row.remove(SESSION_DURATION_COLUMN).unwrap_or_default();
        let (start, end) = match parse_time_range(&time_data, &duration) {
            TimeRange::Parsed { start, end } => (start, end),
            TimeRange::Unparseable => (String::new(), String::new()),
        };
        record.insert("start".to_string(), Value::String(start));
        record.insert("end".to_string(), Value::String(end));
    }
}
