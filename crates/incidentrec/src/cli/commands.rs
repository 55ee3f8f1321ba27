//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::{Args, Subcommand, ValueEnum};

use crate::forms::IncidentDraft;

/// Incident commands.
#[derive(Debug, Subcommand)]
pub enum IncidentCommand {
    /// Record a new incident
    Record(RecordArgs),

    /// Show the most recent incidents, newest first
    Recent {
        /// Number of incidents to show (defaults to the configured count)
        #[arg(short = 'n', long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        count: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "plain")]
        format: OutputFormat,
    },

    /// List every recorded incident, oldest first
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

/// Fields of the incident form.
#[derive(Debug, Args)]
pub struct RecordArgs {
    /// Teacher recording the incident
    #[arg(short, long)]
    pub teacher: String,

    /// Student the incident is about (added to the student list if new)
    #[arg(short, long)]
    pub student: String,

    /// Behaviour label or short key (see `increc behaviours`)
    #[arg(short, long)]
    pub behaviour: String,

    /// Optional free-text notes
    #[arg(short, long, default_value = "")]
    pub notes: String,
}

impl From<RecordArgs> for IncidentDraft {
    fn from(args: RecordArgs) -> Self {
        IncidentDraft::new(args.teacher, args.student, args.behaviour, args.notes)
    }
}

/// Teacher commands.
#[derive(Debug, Subcommand)]
pub enum TeacherCommand {
    /// Save a teacher name
    Add {
        /// The teacher's name
        name: String,
    },

    /// List recorded teachers
    List {
        /// Show the sorted list without duplicates
        #[arg(short, long)]
        unique: bool,
    },
}

/// Student commands.
#[derive(Debug, Subcommand)]
pub enum StudentCommand {
    /// List known students
    List {
        /// Show the sorted list without duplicates
        #[arg(short, long)]
        unique: bool,
    },
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
