//! `incidentrec` - Record classroom behavioural incidents into local CSV files
//!
//! This library provides the CSV-backed record store and the two form
//! controllers (incidents and teachers) that the `increc` binary drives.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod forms;
pub mod logging;
pub mod record;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result, ValidationError};
pub use forms::{IncidentController, IncidentDraft, Roster, TeacherController};
pub use logging::init_logging;
pub use record::{Behaviour, Incident};
pub use storage::{Store, StoreStats};
