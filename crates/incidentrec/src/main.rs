//! `increc` - CLI for incidentrec
//!
//! This binary is the front end for the incident and teacher forms: it reads
//! field values from the command line, hands them to the controllers, and
//! prints what they return.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use incidentrec::cli::{
    Cli, Command, ConfigCommand, IncidentCommand, OutputFormat, StudentCommand, TeacherCommand,
};
use incidentrec::{
    init_logging, Behaviour, Config, Error, Incident, IncidentController, Roster, Store,
    TeacherController,
};

/// Exit status for input rejected by form validation.
const EXIT_VALIDATION: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(invalid) = err.downcast_ref::<Error>().and_then(Error::as_validation) {
                eprintln!("warning: {}", invalid.user_message());
                return ExitCode::from(EXIT_VALIDATION);
            }
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // Config commands load the file themselves so that `path` and `validate`
    // still work when the active configuration is broken.
    let load = || load_config(cli.config.clone(), cli.data_dir.clone());

    match cli.command {
        Command::Incident(cmd) => handle_incident(&load()?, cmd),
        Command::Teacher(cmd) => handle_teacher(&load()?, cmd),
        Command::Student(cmd) => handle_student(&load()?, &cmd),
        Command::Behaviours => {
            handle_behaviours();
            Ok(())
        }
        Command::Status(cmd) => handle_status(&load()?, cmd.json),
        Command::Config(cmd) => handle_config(cli.config, cli.data_dir, cmd),
    }
}

fn load_config(path: Option<PathBuf>, data_dir: Option<PathBuf>) -> anyhow::Result<Config> {
    let mut config = Config::load_from(path).context("loading configuration")?;
    if let Some(dir) = data_dir {
        config.storage.data_dir = Some(dir);
    }
    Ok(config)
}

fn open_store(config: &Config) -> anyhow::Result<Store> {
    Store::from_config(config)
        .with_context(|| format!("opening data directory {}", config.data_dir().display()))
}

fn handle_incident(config: &Config, cmd: IncidentCommand) -> anyhow::Result<()> {
    let store = open_store(config)?;

    match cmd {
        IncidentCommand::Record(args) => {
            let mut controller = IncidentController::new(store, config.display.recent_count);
            let submission = controller.submit(&args.into())?;

            println!("{}", submission.message);
            if submission.student_created {
                println!("Added {} to the student list.", submission.incident.student);
            }
            println!();
            println!("Most-recent incidents:");
            println!("{}", config.render_recent(&submission.recent));
        }
        IncidentCommand::Recent { count, format } => {
            let count = count.unwrap_or(config.display.recent_count);
            let lines = store.recent_incidents(count)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&lines)?),
                OutputFormat::Plain | OutputFormat::Table => {
                    println!("{}", config.render_recent(&lines));
                }
            }
        }
        IncidentCommand::List { format } => {
            let incidents = store.incidents()?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&incidents)?),
                OutputFormat::Table => print_incident_table(&incidents, config),
                OutputFormat::Plain => {
                    for incident in &incidents {
                        println!(
                            "{} | {} | {} | {} | {}",
                            incident.timestamp_string(),
                            incident.teacher,
                            incident.student,
                            incident.behaviour,
                            incident.notes
                        );
                    }
                }
            }
        }
    }
    Ok(())
}

fn print_incident_table(incidents: &[Incident], config: &Config) {
    if incidents.is_empty() {
        println!("{}", config.display.placeholder);
        return;
    }

    let width = |column: fn(&Incident) -> usize, title: &str| {
        incidents
            .iter()
            .map(column)
            .max()
            .unwrap_or(0)
            .max(title.len())
    };
    let teacher_w = width(|i| i.teacher.chars().count(), "TEACHER");
    let student_w = width(|i| i.student.chars().count(), "STUDENT");
    let behaviour_w = width(|i| i.behaviour.label().len(), "BEHAVIOUR");

    println!(
        "{:<19}  {:<teacher_w$}  {:<student_w$}  {:<behaviour_w$}  NOTES",
        "TIMESTAMP", "TEACHER", "STUDENT", "BEHAVIOUR"
    );
    for incident in incidents {
        println!(
            "{:<19}  {:<teacher_w$}  {:<student_w$}  {:<behaviour_w$}  {}",
            incident.timestamp_string(),
            incident.teacher,
            incident.student,
            incident.behaviour.label(),
            incident.notes
        );
    }
}

fn handle_teacher(config: &Config, cmd: TeacherCommand) -> anyhow::Result<()> {
    let controller = TeacherController::new(open_store(config)?);

    match cmd {
        TeacherCommand::Add { name } => {
            let saved = controller.add(&name)?;
            println!("{}", saved.message);
        }
        TeacherCommand::List { unique } => {
            print_roster(&controller.open()?, unique, "No teachers recorded yet.");
        }
    }
    Ok(())
}

fn handle_student(config: &Config, cmd: &StudentCommand) -> anyhow::Result<()> {
    let controller = IncidentController::new(open_store(config)?, config.display.recent_count);

    match cmd {
        StudentCommand::List { unique } => {
            let state = controller.open()?;
            print_roster(&state.students, *unique, "No students recorded yet.");
        }
    }
    Ok(())
}

fn print_roster(roster: &Roster, unique: bool, empty_message: &str) {
    if roster.is_empty() {
        println!("{empty_message}");
        return;
    }
    if unique {
        roster.choices().iter().for_each(|name| println!("{name}"));
    } else {
        roster.names().iter().for_each(|name| println!("{name}"));
    }
}

fn handle_behaviours() {
    for behaviour in Behaviour::ALL {
        let sign = if behaviour.is_positive() { '+' } else { '-' };
        println!("{sign} {:<16}  {}", behaviour.key(), behaviour.label());
    }
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let stats = open_store(config)?.stats()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("increc status");
        println!("-------------");
        println!("Data directory: {}", stats.data_dir.display());
        println!(
            "Teachers:       {} ({})",
            stats.teachers, config.storage.teachers_file
        );
        println!(
            "Students:       {} ({})",
            stats.students, config.storage.students_file
        );
        println!(
            "Incidents:      {} ({})",
            stats.incidents, config.storage.incidents_file
        );
    }
    Ok(())
}

fn handle_config(
    path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    cmd: ConfigCommand,
) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = load_config(path, data_dir)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Data directory:     {}", config.data_dir().display());
                println!("  Teachers file:      {}", config.storage.teachers_file);
                println!("  Students file:      {}", config.storage.students_file);
                println!("  Incidents file:     {}", config.storage.incidents_file);
                println!();
                println!("[Display]");
                println!("  Recent count:       {}", config.display.recent_count);
                println!("  Placeholder:        {}", config.display.placeholder);
            }
        }
        ConfigCommand::Path => {
            println!("{}", path.unwrap_or_else(Config::default_config_path).display());
        }
        ConfigCommand::Validate { file } => {
            let file = file.or(path).unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", file.display());
            Config::load_from(Some(file.clone()))
                .with_context(|| format!("configuration {} is invalid", file.display()))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
