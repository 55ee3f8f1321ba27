//! Storage layer for incidentrec.
//!
//! All persisted state lives in three CSV files inside one data directory:
//! a teacher list, a student list, and an append-only incident log. The
//! files are the single source of truth; nothing here caches their contents.

pub mod csv_file;
pub mod recent;
pub mod schema;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::record::Incident;

pub use csv_file::{append_row, read_column, read_rows};
pub use recent::{format_row, recent_incidents, DEFAULT_RECENT_COUNT};
pub use schema::{FileKind, INCIDENT_HEADER};

/// Handle on the data directory and its three files.
#[derive(Debug, Clone)]
pub struct Store {
    data_dir: PathBuf,
    teachers: PathBuf,
    students: PathBuf,
    incidents: PathBuf,
}

impl Store {
    /// Open the store described by the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage = &config.storage;
        Self::open_with_names(
            config.data_dir(),
            &storage.teachers_file,
            &storage.students_file,
            &storage.incidents_file,
        )
    }

    /// Open a store in `data_dir` using the default file names.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let defaults = crate::config::StorageConfig::default();
        Self::open_with_names(
            data_dir,
            &defaults.teachers_file,
            &defaults.students_file,
            &defaults.incidents_file,
        )
    }

    /// Open a store with explicit file names.
    ///
    /// Creates the data directory if it does not exist. The files themselves
    /// are created lazily on first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn open_with_names(
        data_dir: impl AsRef<Path>,
        teachers_file: &str,
        students_file: &str,
        incidents_file: &str,
    ) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();

        if !data_dir.exists() {
            std::fs::create_dir_all(&data_dir).map_err(|source| Error::DirectoryCreate {
                path: data_dir.clone(),
                source,
            })?;
            info!("Created data directory {}", data_dir.display());
        }

        debug!("Opened store at {}", data_dir.display());
        Ok(Self {
            teachers: data_dir.join(teachers_file),
            students: data_dir.join(students_file),
            incidents: data_dir.join(incidents_file),
            data_dir,
        })
    }

    /// The data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file of the given kind.
    #[must_use]
    pub fn path(&self, kind: FileKind) -> &Path {
        match kind {
            FileKind::Teachers => &self.teachers,
            FileKind::Students => &self.students,
            FileKind::Incidents => &self.incidents,
        }
    }

    /// Read every teacher name, in file order (duplicates included).
    ///
    /// # Errors
    ///
    /// Returns an error if the teacher file cannot be read.
    pub fn teachers(&self) -> Result<Vec<String>> {
        read_column(&self.teachers)
    }

    /// Read every student name, in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if the student file cannot be read.
    pub fn students(&self) -> Result<Vec<String>> {
        read_column(&self.students)
    }

    /// Append a teacher name as a single-field row.
    ///
    /// # Errors
    ///
    /// Returns an error if the teacher file cannot be written.
    pub fn append_teacher(&self, name: &str) -> Result<()> {
        self.append(FileKind::Teachers, [name])
    }

    /// Append a student name as a single-field row.
    ///
    /// # Errors
    ///
    /// Returns an error if the student file cannot be written.
    pub fn append_student(&self, name: &str) -> Result<()> {
        self.append(FileKind::Students, [name])
    }

    /// Append an incident row, writing the header first if the file is new.
    ///
    /// # Errors
    ///
    /// Returns an error if the incidents file cannot be written.
    pub fn append_incident(&self, incident: &Incident) -> Result<()> {
        self.append(FileKind::Incidents, incident.to_row())?;
        info!(
            "Recorded incident for {} ({})",
            incident.student, incident.behaviour
        );
        Ok(())
    }

    /// Read every incident, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a row is malformed.
    pub fn incidents(&self) -> Result<Vec<Incident>> {
        let rows = read_rows(&self.incidents)?;

        schema::incident_data_rows(&rows)
            .iter()
            .enumerate()
            .map(|(index, record)| {
                record
                    .deserialize::<Incident>(None)
                    .map_err(|err| Error::MalformedRow {
                        path: self.incidents.clone(),
                        row: index + 1,
                        message: err.to_string(),
                    })
            })
            .collect()
    }

    /// The most recent `n` incidents as display lines, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the incidents file cannot be read.
    pub fn recent_incidents(&self, n: usize) -> Result<Vec<String>> {
        recent_incidents(&self.incidents, n)
    }

    /// Count data rows in each file.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be read.
    pub fn stats(&self) -> Result<StoreStats> {
        let incident_rows = read_rows(&self.incidents)?;
        let incidents = schema::incident_data_rows(&incident_rows).len();

        Ok(StoreStats {
            data_dir: self.data_dir.clone(),
            teachers: self.teachers()?.len(),
            students: self.students()?.len(),
            incidents,
        })
    }

    fn append<I, T>(&self, kind: FileKind, row: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let created = append_row(self.path(kind), kind.header(), row)?;
        if created {
            info!("Created {} file {}", kind, self.path(kind).display());
        }
        Ok(())
    }
}

/// Row counts for the files in a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// The data directory.
    pub data_dir: PathBuf,
    /// Rows in the teacher file.
    pub teachers: usize,
    /// Rows in the student file.
    pub students: usize,
    /// Data rows in the incidents file (header excluded).
    pub incidents: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Behaviour, TIMESTAMP_FORMAT};
    use chrono::NaiveDateTime;

    fn create_test_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let store = Store::open(dir.path()).expect("failed to open store");
        (dir, store)
    }

    fn incident(student: &str, notes: &str) -> Incident {
        Incident::at(
            NaiveDateTime::parse_from_str("2024-03-05 09:15:42", TIMESTAMP_FORMAT).unwrap(),
            "Smith".to_string(),
            student.to_string(),
            Behaviour::ExcellentEffort,
            notes.to_string(),
        )
    }

    #[test]
    fn test_open_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("Documents").join("TeachersData");

        let store = Store::open(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.data_dir(), nested);
    }

    #[test]
    fn test_open_does_not_create_files() {
        let (_dir, store) = create_test_store();
        assert!(!store.path(FileKind::Incidents).exists());
        assert!(!store.path(FileKind::Teachers).exists());
        assert!(!store.path(FileKind::Students).exists());
    }

    #[test]
    fn test_default_file_names() {
        let (_dir, store) = create_test_store();
        assert!(store.path(FileKind::Teachers).ends_with("teachers.csv"));
        assert!(store.path(FileKind::Students).ends_with("students.csv"));
        assert!(store.path(FileKind::Incidents).ends_with("incidents.csv"));
    }

    #[test]
    fn test_empty_store_reads_empty() {
        let (_dir, store) = create_test_store();
        assert!(store.teachers().unwrap().is_empty());
        assert!(store.students().unwrap().is_empty());
        assert!(store.incidents().unwrap().is_empty());
        assert!(store.recent_incidents(2).unwrap().is_empty());
    }

    #[test]
    fn test_teacher_duplicates_are_kept() {
        let (_dir, store) = create_test_store();
        store.append_teacher("Smith").unwrap();
        store.append_teacher("Jones").unwrap();
        store.append_teacher("Smith").unwrap();

        assert_eq!(store.teachers().unwrap(), vec!["Smith", "Jones", "Smith"]);
    }

    #[test]
    fn test_name_files_have_no_header() {
        let (_dir, store) = create_test_store();
        store.append_student("Alice").unwrap();

        let contents = std::fs::read_to_string(store.path(FileKind::Students)).unwrap();
        assert_eq!(contents, "Alice\n");
    }

    #[test]
    fn test_append_incident_writes_header_and_row() {
        let (_dir, store) = create_test_store();
        store.append_incident(&incident("Alice", "")).unwrap();

        let contents = std::fs::read_to_string(store.path(FileKind::Incidents)).unwrap();
        assert_eq!(
            contents,
            "timestamp,teacher,student,behaviour,notes\n\
             2024-03-05 09:15:42,Smith,Alice,Excellent Effort,\n"
        );
    }

    #[test]
    fn test_incident_with_comma_round_trips() {
        let (_dir, store) = create_test_store();
        let original = incident("Alice", "helped Bob, then Cara \"twice\"");
        store.append_incident(&original).unwrap();

        let read_back = store.incidents().unwrap();
        assert_eq!(read_back, vec![original]);
    }

    #[test]
    fn test_incidents_malformed_row() {
        let (_dir, store) = create_test_store();
        std::fs::write(
            store.path(FileKind::Incidents),
            "timestamp,teacher,student,behaviour,notes\nyesterday,Smith,Alice,Excellent Effort,\n",
        )
        .unwrap();

        let err = store.incidents().unwrap_err();
        assert!(matches!(err, Error::MalformedRow { row: 1, .. }));
    }

    #[test]
    fn test_stats_counts() {
        let (_dir, store) = create_test_store();
        store.append_teacher("Smith").unwrap();
        store.append_student("Alice").unwrap();
        store.append_student("Bob").unwrap();
        store.append_incident(&incident("Alice", "")).unwrap();
        store.append_incident(&incident("Bob", "")).unwrap();
        store.append_incident(&incident("Alice", "again")).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.teachers, 1);
        assert_eq!(stats.students, 2);
        assert_eq!(stats.incidents, 3);
    }

    #[test]
    fn test_from_config_uses_custom_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.data_dir = Some(dir.path().to_path_buf());
        config.storage.students_file = "class_7b.csv".to_string();

        let store = Store::from_config(&config).unwrap();
        assert_eq!(store.path(FileKind::Students), dir.path().join("class_7b.csv"));
    }
}
