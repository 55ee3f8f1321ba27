//! CSV layout definitions for incidentrec.
//!
//! Each data file has a fixed kind; the kind decides whether a header row is
//! written when the file is first created.

use std::fmt;

/// Header row of the incidents file.
pub const INCIDENT_HEADER: [&str; 5] = ["timestamp", "teacher", "student", "behaviour", "notes"];

/// Column indexes in the incidents file.
pub mod incident_columns {
    /// Submission timestamp.
    pub const TIMESTAMP: usize = 0;
    /// Student name.
    pub const STUDENT: usize = 2;
    /// Behaviour label.
    pub const BEHAVIOUR: usize = 3;
    /// Free-text notes.
    pub const NOTES: usize = 4;
}

/// The kinds of file kept in the data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Single-column list of teacher names.
    Teachers,
    /// Single-column list of student names.
    Students,
    /// Append-only incident log.
    Incidents,
}

impl FileKind {
    /// Header written when the file is created, if any.
    #[must_use]
    pub fn header(self) -> Option<&'static [&'static str]> {
        match self {
            Self::Incidents => Some(&INCIDENT_HEADER[..]),
            Self::Teachers | Self::Students => None,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Teachers => write!(f, "teachers"),
            Self::Students => write!(f, "students"),
            Self::Incidents => write!(f, "incidents"),
        }
    }
}

/// Check whether a raw row is the incidents header.
#[must_use]
pub fn is_incident_header(record: &csv::StringRecord) -> bool {
    record
        .get(incident_columns::TIMESTAMP)
        .is_some_and(|first| first.trim() == INCIDENT_HEADER[0])
}

/// The data rows of an incidents file, skipping a leading header if present.
#[must_use]
pub fn incident_data_rows(rows: &[csv::StringRecord]) -> &[csv::StringRecord] {
    match rows.first() {
        Some(first) if is_incident_header(first) => &rows[1..],
        _ => rows,
    }
}
