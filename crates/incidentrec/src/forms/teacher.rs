//! Teacher form: record teacher names one at a time.
//!
//! Unlike students, teacher names are appended even when already present.

use serde::Serialize;
use tracing::{info, warn};

use super::{clean, Roster};
use crate::error::{Error, Field, Result};
use crate::storage::Store;

/// Result of a successful teacher submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeacherSaved {
    /// The name as stored (trimmed).
    pub name: String,
    /// The teacher roster after the save, file order.
    pub teachers: Roster,
    /// Status line for the user.
    pub message: String,
}

/// Drives the teacher-recording workflow against a [`Store`].
#[derive(Debug)]
pub struct TeacherController {
    store: Store,
}

impl TeacherController {
    /// Create a controller over `store`.
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The recorded teachers, file order, duplicates included.
    ///
    /// # Errors
    ///
    /// Returns an error if the teacher file cannot be read.
    pub fn open(&self) -> Result<Roster> {
        Ok(Roster::from(self.store.teachers()?))
    }

    /// Validate and save a teacher name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the name is blank (nothing is written),
    /// or a storage error if the teacher file cannot be read or written.
    pub fn add(&self, name: &str) -> Result<TeacherSaved> {
        let name = clean(name);
        if name.is_empty() {
            warn!("Teacher name rejected: blank");
            return Err(Error::missing(vec![Field::TeacherName]));
        }

        self.store.append_teacher(&name)?;
        info!("Saved teacher {}", name);

        Ok(TeacherSaved {
            teachers: self.open()?,
            message: format!("Saved: {name}"),
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::logging::init_test_logging;
    use crate::storage::FileKind;

    fn create_test_controller() -> (tempfile::TempDir, TeacherController) {
        init_test_logging();
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let store = Store::open(dir.path()).expect("failed to open store");
        (dir, TeacherController::new(store))
    }

    #[test]
    fn test_add_persists_and_reports() {
        let (_dir, controller) = create_test_controller();

        let saved = controller.add("  Ms Smith ").unwrap();

        assert_eq!(saved.name, "Ms Smith");
        assert_eq!(saved.message, "Saved: Ms Smith");
        assert_eq!(saved.teachers.names(), ["Ms Smith"]);
        let contents = std::fs::read_to_string(controller.store().path(FileKind::Teachers)).unwrap();
        assert_eq!(contents, "Ms Smith\n");
    }

    #[test]
    fn test_add_whitespace_only_is_rejected() {
        let (_dir, controller) = create_test_controller();

        let err = controller.add("  ").unwrap_err();

        assert_eq!(
            err.as_validation(),
            Some(&ValidationError::MissingFields(vec![Field::TeacherName]))
        );
        assert!(!controller.store().path(FileKind::Teachers).exists());
    }

    #[test]
    fn test_add_keeps_duplicates() {
        let (_dir, controller) = create_test_controller();
        controller.add("Smith").unwrap();
        controller.add("Jones").unwrap();
        let saved = controller.add("Smith").unwrap();

        assert_eq!(saved.teachers.names(), ["Smith", "Jones", "Smith"]);
        assert_eq!(saved.teachers.choices(), vec!["Jones", "Smith"]);
    }

    #[test]
    fn test_rejected_add_leaves_existing_file_untouched() {
        let (_dir, controller) = create_test_controller();
        controller.add("Smith").unwrap();
        let before = std::fs::read(controller.store().path(FileKind::Teachers)).unwrap();

        assert!(controller.add("\t").is_err());

        let after = std::fs::read(controller.store().path(FileKind::Teachers)).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_open_reads_existing_names() {
        let (_dir, controller) = create_test_controller();
        std::fs::write(controller.store().path(FileKind::Teachers), "Adams\nBrown\n").unwrap();

        assert_eq!(controller.open().unwrap().names(), ["Adams", "Brown"]);
    }

    #[test]
    fn test_name_with_comma_round_trips() {
        let (_dir, controller) = create_test_controller();
        controller.add("Smith, J.").unwrap();

        assert_eq!(controller.open().unwrap().names(), ["Smith, J."]);
    }
}
