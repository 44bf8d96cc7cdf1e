pub mod rows;
pub mod sessions;
pub mod slug;
pub mod timeblocks;
pub mod timeparse;

use crate::config::ColumnConfig;
use crate::types::{RawRow, ScheduleDocument};
use serde::Serialize;
use tracing::info;

/// Counts from one pipeline run, for operator-facing reporting
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub timeblocks_kept: usize,
    pub timeblocks_dropped: usize,
    pub sessions_kept: usize,
    pub sessions_dropped: usize,
}

/// Runs both pipelines over the fetched rows and assembles the document.
pub fn build_document(
    timeblock_rows: &[RawRow],
    session_rows: &[RawRow],
    columns: &ColumnConfig,
) -> (ScheduleDocument, RunSummary) {
    info!("Transforming {} timeblock rows", timeblock_rows.len());
    let (timeblocks, timeblocks_dropped) = timeblocks::run_timeblock_pipeline(timeblock_rows);

    info!("Transforming {} session rows", session_rows.len());
    let (sessions, sessions_dropped) = sessions::run_session_pipeline(session_rows, columns);

    let summary = RunSummary {
        timeblocks_kept: timeblocks.len(),
        timeblocks_dropped: timeblocks_dropped.len(),
        sessions_kept: sessions.len(),
        sessions_dropped: sessions_dropped.len(),
    };
    info!(
        "Transformed {} timeblocks ({} dropped), {} sessions ({} dropped)",
        summary.timeblocks_kept,
        summary.timeblocks_dropped,
        summary.sessions_kept,
        summary.sessions_dropped
    );

    (
        ScheduleDocument {
            timeblocks,
            sessions,
        },
        summary,
    )
}
