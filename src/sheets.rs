use crate::config::SpreadsheetConfig;
use crate::constants::TIMEBLOCK_WORKSHEET_TITLE;
use crate::error::{PublishError, Result};
use crate::types::{RawRow, Worksheet};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Provider of worksheet rows. The pipelines only require an ordered
/// sequence of row mappings; where they come from is this boundary's
/// concern.
#[async_trait::async_trait]
pub trait WorksheetSource: Send + Sync {
    /// Rows of the spreadsheet's first worksheet
    async fn default_worksheet_rows(&self) -> Result<Vec<RawRow>>;

    /// Rows of the named worksheets, concatenated in spreadsheet order
    async fn worksheet_rows(&self, titles: &[String]) -> Result<Vec<RawRow>>;
}

/// Raw rows for both pipelines
#[derive(Debug, Clone)]
pub struct ScheduleRows {
    pub timeblocks: Vec<RawRow>,
    pub sessions: Vec<RawRow>,
}

/// Fetches the timeblock and session row sets according to the configured
/// worksheet mode. With multi-sheet mode off, both pipelines read the
/// default worksheet.
pub async fn fetch_schedule_rows(
    source: &dyn WorksheetSource,
    config: &SpreadsheetConfig,
) -> Result<ScheduleRows> {
    if config.fetch_multiple_worksheets {
        let timeblocks = source
            .worksheet_rows(&[TIMEBLOCK_WORKSHEET_TITLE.to_string()])
            .await?;
        let sessions = source.worksheet_rows(&config.sessions_worksheets).await?;
        Ok(ScheduleRows {
            timeblocks,
            sessions,
        })
    } else {
        let rows = source.default_worksheet_rows().await?;
        Ok(ScheduleRows {
            timeblocks: rows.clone(),
            sessions: rows,
        })
    }
}

/// Google Sheets v4 client
pub struct SheetsClient {
    client: reqwest::Client,
    spreadsheet_key: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

impl SheetsClient {
    pub fn new(config: &SpreadsheetConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            spreadsheet_key: config.key.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Titles of all worksheets, in spreadsheet order.
    async fn worksheet_titles(&self) -> Result<Vec<String>> {
        let url = format!(
            "{SHEETS_API_BASE}/{}?fields=sheets.properties.title",
            self.spreadsheet_key
        );
        let meta: SpreadsheetMeta = self
            .client
            .get(&url)
            .query(&[("key", &self.api_key)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(meta
            .sheets
            .into_iter()
            .map(|sheet| sheet.properties.title)
            .collect())
    }

    #[instrument(skip(self))]
    async fn fetch_worksheet(&self, title: &str) -> Result<Worksheet> {
        let url = format!(
            "{SHEETS_API_BASE}/{}/values/{}",
            self.spreadsheet_key, title
        );
        let range: ValueRange = self
            .client
            .get(&url)
            .query(&[("key", &self.api_key)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let rows = rows_from_values(range.values);
        debug!("Fetched {} rows from worksheet '{}'", rows.len(), title);
        Ok(Worksheet {
            title: title.to_string(),
            rows,
        })
    }
}

#[async_trait::async_trait]
impl WorksheetSource for SheetsClient {
    async fn default_worksheet_rows(&self) -> Result<Vec<RawRow>> {
        let titles = self.worksheet_titles().await?;
        let first = titles.into_iter().next().ok_or_else(|| {
            PublishError::MissingField("spreadsheet has no worksheets".into())
        })?;
        Ok(self.fetch_worksheet(&first).await?.rows)
    }

    async fn worksheet_rows(&self, wanted: &[String]) -> Result<Vec<RawRow>> {
        let titles = self.worksheet_titles().await?;

        let mut rows = Vec::new();
        for title in titles.iter().filter(|t| wanted.contains(t)) {
            let worksheet = self.fetch_worksheet(title).await?;
            rows.extend(worksheet.rows);
        }
        info!(
            "Fetched {} rows from {} worksheet(s)",
            rows.len(),
            wanted.len()
        );
        Ok(rows)
    }
}

/// Converts a worksheet's cell grid into row mappings, consuming the first
/// row as the header. Short rows are padded with empty strings so every
/// row exposes the full column set.
pub fn rows_from_values(values: Vec<Vec<Value>>) -> Vec<RawRow> {
    let mut grid = values.into_iter();
    let Some(header_cells) = grid.next() else {
        return Vec::new();
    };
    let headers: Vec<String> = header_cells.iter().map(cell_text).collect();

    grid.map(|cells| {
        headers
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let value = cells.get(i).cloned().unwrap_or(Value::String(String::new()));
                (name.clone(), value)
            })
            .collect()
    })
    .collect()
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn consumes_header_row_and_pads_short_rows() {
        let values = vec![
            vec![json!("day"), json!("start time"), json!("room")],
            vec![json!("Monday"), json!("09:00"), json!("Hall A")],
            vec![json!("Tuesday")],
        ];

        let rows = rows_from_values(values);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["room"], json!("Hall A"));
        assert_eq!(rows[1]["day"], json!("Tuesday"));
        assert_eq!(rows[1]["start time"], json!(""));
    }

    #[test]
    fn empty_grid_yields_no_rows() {
        assert!(rows_from_values(Vec::new()).is_empty());
    }

    #[test]
    fn numeric_headers_are_stringified() {
        let values = vec![vec![json!(2024)], vec![json!("x")]];
        let rows = rows_from_values(values);
        assert_eq!(rows[0]["2024"], json!("x"));
    }
}
