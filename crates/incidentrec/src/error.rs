//! Error types for incidentrec.
//!
//! Errors fall into two families: validation failures, which the caller
//! recovers from by warning the user, and storage failures, which abort the
//! current operation.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A required form field that was missing or blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The teacher recording the incident.
    Teacher,
    /// The student the incident is about.
    Student,
    /// The behaviour category.
    Behaviour,
    /// A teacher name submitted through the teacher form.
    TeacherName,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Teacher => write!(f, "teacher"),
            Self::Student => write!(f, "student"),
            Self::Behaviour => write!(f, "behaviour"),
            Self::TeacherName => write!(f, "teacher name"),
        }
    }
}

/// Why a form submission was rejected before anything was written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more required fields were empty after trimming.
    #[error("missing required fields: {}", join_fields(.0))]
    MissingFields(Vec<Field>),

    /// The behaviour did not name one of the known categories.
    #[error("unknown behaviour '{0}'")]
    UnknownBehaviour(String),
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    /// The warning shown to the user for this failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingFields(fields) if fields == &[Field::TeacherName] => {
                "Please enter or select a teacher name.".to_string()
            }
            Self::MissingFields(_) => "Teacher, student, and behaviour are required.".to_string(),
            Self::UnknownBehaviour(value) => {
                format!("'{value}' is not a known behaviour. Run `increc behaviours` to list them.")
            }
        }
    }
}

/// The main error type for incidentrec operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Validation Errors ===
    /// A form submission failed validation; nothing was written.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    // === Storage Errors ===
    /// Failed to read a CSV file.
    #[error("failed to read {path}: {source}")]
    CsvRead {
        /// Path to the CSV file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: csv::Error,
    },

    /// Failed to append to a CSV file.
    #[error("failed to write {path}: {source}")]
    CsvWrite {
        /// Path to the CSV file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: csv::Error,
    },

    /// A stored incident row could not be interpreted.
    #[error("malformed incident row {row} in {path}: {message}")]
    MalformedRow {
        /// Path to the CSV file.
        path: PathBuf,
        /// One-based data row number.
        row: usize,
        /// Description of what went wrong.
        message: String,
    },

    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },
}

/// A specialized Result type for incidentrec operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a missing-fields validation error.
    #[must_use]
    pub fn missing(fields: Vec<Field>) -> Self {
        Self::Validation(ValidationError::MissingFields(fields))
    }

    /// Check if this error is a recoverable validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error came from the file store.
    #[must_use]
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::CsvRead { .. }
                | Self::CsvWrite { .. }
                | Self::MalformedRow { .. }
                | Self::Io(_)
                | Self::DirectoryCreate { .. }
        )
    }

    /// The validation failure, if this is one.
    #[must_use]
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}
