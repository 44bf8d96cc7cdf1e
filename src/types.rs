use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Raw row as fetched from a worksheet: column name → arbitrary scalar
pub type RawRow = serde_json::Map<String, Value>;

/// Normalized row: non-empty column names only, every value coerced to text
pub type Row = BTreeMap<String, String>;

/// Transformed output record. Values are mixed (strings, nested facilitator
/// objects, numbers, booleans, null); the map keeps keys sorted for
/// deterministic serialization.
pub type Record = BTreeMap<String, Value>;

/// Why a row was excluded from the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Timeblock row with an empty `day` field
    BlankDay,
    /// Timeblock row still holding the dropdown instruction placeholder
    InstructionPlaceholder,
    /// Timeblock row with an empty `start time` field
    BlankStartTime,
    /// Session row with no title
    MissingTitle,
    /// Session row whose id is empty or contains whitespace
    InvalidId,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::BlankDay => "blank day",
            DropReason::InstructionPlaceholder => "dropdown instruction placeholder",
            DropReason::BlankStartTime => "blank start time",
            DropReason::MissingTitle => "missing title",
            DropReason::InvalidId => "invalid session id",
        }
    }
}

/// Result of pushing one row through a transform: either a publishable
/// record or a drop with its reason. Dropped rows are expected data-quality
/// noise, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Kept(Record),
    Dropped(DropReason),
}

/// One worksheet fetched from the source spreadsheet, header row already
/// consumed into the row keys
#[derive(Debug, Clone)]
pub struct Worksheet {
    pub title: String,
    pub rows: Vec<RawRow>,
}

/// The published document: ordered timeblocks plus transformed sessions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleDocument {
    pub timeblocks: Vec<Record>,
    pub sessions: Vec<Record>,
}
