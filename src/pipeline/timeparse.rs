use chrono::{Duration, NaiveTime, Timelike};

/// Outcome of parsing a free-text time range. Parse failure is a typed
/// result, never an error: an unparseable row keeps its place in the output
/// with empty time fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeRange {
    Parsed { start: String, end: String },
    Unparseable,
}

/// Parses time text shaped like "Saturday (10:00)" together with a duration
/// in minutes. The start of the slot is the final `HH:MM` inside the last
/// parenthesized group; the end is start plus duration, both rendered as
/// 12-hour times like `9:30am`.
pub fn parse_time_range(time_text: &str, duration_text: &str) -> TimeRange {
    // Take everything after the last '(' and shed closing parens, then keep
    // only the trailing 5 characters (expected shape HH:MM)
    let tail = time_text.rsplit('(').next().unwrap_or("").trim_matches(')');
    let chars: Vec<char> = tail.chars().collect();
    let start_text: String = chars[chars.len().saturating_sub(5)..].iter().collect();

    let start = match NaiveTime::parse_from_str(&start_text, "%H:%M") {
        Ok(t) => t,
        Err(_) => return TimeRange::Unparseable,
    };

    let minutes: i64 = if duration_text.is_empty() {
        0
    } else {
        match duration_text.trim().parse() {
            Ok(m) => m,
            Err(_) => return TimeRange::Unparseable,
        }
    };

    let Some(offset) = Duration::try_minutes(minutes) else {
        return TimeRange::Unparseable;
    };

    let end = start + offset;
    TimeRange::Parsed {
        start: to_twelve_hour(start),
        end: to_twelve_hour(end),
    }
}

/// 12-hour rendering with the leading zero stripped and a lowercase
/// am/pm suffix, e.g. `9:30am`, `12:05pm`.
fn to_twelve_hour(time: NaiveTime) -> String {
    let (is_pm, hour) = time.hour12();
    let suffix = if is_pm { "pm" } else { "am" };
    format!("{}:{:02}{}", hour, time.minute(), suffix)
}
