//! Command-line interface for incidentrec.
//!
//! This module provides the CLI structure for the `increc` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, IncidentCommand, OutputFormat, RecordArgs, StatusCommand, StudentCommand,
    TeacherCommand,
};

use crate::logging::Verbosity;

/// increc - Record classroom incidents
///
/// Records behavioural incidents and teacher names into CSV files in a local
/// data directory, and shows the most recent incidents after each entry.
#[derive(Debug, Parser)]
#[command(name = "increc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the data directory
    #[arg(short, long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record and review incidents
    #[command(subcommand)]
    Incident(IncidentCommand),

    /// Record and list teachers
    #[command(subcommand)]
    Teacher(TeacherCommand),

    /// List students
    #[command(subcommand)]
    Student(StudentCommand),

    /// List the behaviour categories
    Behaviours,

    /// Show data file locations and row counts
    Status(StatusCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
