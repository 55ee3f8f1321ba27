//! Recent-incidents display lines.

use std::path::Path;

use csv::StringRecord;

use super::csv_file::read_rows;
use super::schema::{incident_columns, incident_data_rows};
use crate::error::Result;
use crate::record::DISPLAY_TIMESTAMP_LEN;

/// Number of incidents shown when no count is configured.
pub const DEFAULT_RECENT_COUNT: usize = 2;

/// Read the incidents file and return the last `n` rows, newest first, as
/// display lines of the form `"<timestamp[0:16]> | <student> | <behaviour> | <notes>"`.
///
/// An absent file or one with no data rows yields an empty list.
///
/// # Errors
///
/// Returns an error if the incidents file exists but cannot be read.
pub fn recent_incidents(path: &Path, n: usize) -> Result<Vec<String>> {
    let rows = read_rows(path)?;

    Ok(incident_data_rows(&rows)
        .iter()
        .rev()
        .take(n)
        .map(format_row)
        .collect())
}

/// Format one raw incident row for display. Missing fields render empty.
#[must_use]
pub fn format_row(record: &StringRecord) -> String {
    let field = |index| record.get(index).unwrap_or_default();
    let timestamp: String = field(incident_columns::TIMESTAMP)
        .chars()
        .take(DISPLAY_TIMESTAMP_LEN)
        .collect();

    format!(
        "{} | {} | {} | {}",
        timestamp,
        field(incident_columns::STUDENT),
        field(incident_columns::BEHAVIOUR),
        field(incident_columns::NOTES)
    )
}
