/// Column labels, sentinel values, and fixed strings shared across the pipelines

// Worksheet that holds the timeblock definitions (title is fixed in the
// source spreadsheet)
pub const TIMEBLOCK_WORKSHEET_TITLE: &str = "* Timeblock Values";

// Source column names with special handling
pub const TIMEBLOCK_KEY_COLUMN: &str = "Auto Generated. Do Not Modify.";
pub const SESSION_NAME_COLUMN: &str = "name";
pub const SESSION_ID_COLUMN: &str = "session id";
pub const SESSION_TIMEBLOCK_COLUMN: &str = "timeblock";
pub const SESSION_DURATION_COLUMN: &str = "duration";
pub const FACILITATOR_COLUMN_PREFIX: &str = "facilitator";

// Fallback labels when no custom column labels are configured
pub const DEFAULT_CATEGORY_LABEL: &str = "category";
pub const DEFAULT_TAGS_LABEL: &str = "tags";

// Placeholder text left behind by the spreadsheet dropdown UI
pub const DROPDOWN_INSTRUCTION_TEXT: &str = "select from dropdown";

// Sessions with this category are event-wide programmatic pieces, not
// user-submitted sessions
pub const PROGRAMMATIC_CATEGORY: &str = "Programmatic Pieces";

// Workflow markers that must never be published as tags
pub const TAG_SKIP_KEYWORDS: [&str; 4] = ["accepted", "consideration", "stipend", "sample"];

// Weekday names in rank order, Monday first
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

// Commit messages used by the publisher
pub const CREATE_COMMIT_MESSAGE: &str = "adding session data";
pub const UPDATE_COMMIT_MESSAGE: &str = "updating schedule data";

// Default output artifact name
pub const DEFAULT_TARGET_FILE: &str = "sessions.json";

/// Rank of a weekday name, Monday=1 through Sunday=7. Unrecognized day text
/// sorts after every real weekday.
pub fn weekday_rank(day: &str) -> u8 {
    WEEKDAYS
        .iter()
        .position(|d| *d == day)
        .map(|i| i as u8 + 1)
        .unwrap_or(8)
}
