//! Incident form: validate, ensure the student exists, append the incident,
//! refresh the recent-incidents display.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{clean, Roster};
use crate::error::{Error, Field, Result, ValidationError};
use crate::record::{self, Behaviour, Incident};
use crate::storage::Store;

/// Raw field values as entered on the incident form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IncidentDraft {
    /// Teacher name.
    pub teacher: String,
    /// Student name.
    pub student: String,
    /// Behaviour label or short key.
    pub behaviour: String,
    /// Free-text notes.
    pub notes: String,
}

impl IncidentDraft {
    /// Create a draft from raw field values.
    #[must_use]
    pub fn new(
        teacher: impl Into<String>,
        student: impl Into<String>,
        behaviour: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            teacher: teacher.into(),
            student: student.into(),
            behaviour: behaviour.into(),
            notes: notes.into(),
        }
    }

    /// Check required fields and build the incident to store.
    ///
    /// All fields are trimmed. Every missing field is reported at once.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if teacher, student or behaviour is blank,
    /// or if the behaviour is not a known category.
    pub fn validate(&self, timestamp: NaiveDateTime) -> std::result::Result<Incident, ValidationError> {
        let teacher = clean(&self.teacher);
        let student = clean(&self.student);
        let behaviour = clean(&self.behaviour);

        let missing: Vec<Field> = [
            (Field::Teacher, &teacher),
            (Field::Student, &student),
            (Field::Behaviour, &behaviour),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let behaviour: Behaviour = behaviour.parse()?;
        Ok(Incident::at(
            timestamp,
            teacher,
            student,
            behaviour,
            clean(&self.notes),
        ))
    }

    /// The draft left on the form after a successful submission: teacher and
    /// student stay selected, behaviour and notes are emptied.
    #[must_use]
    pub fn cleared(&self) -> Self {
        Self {
            teacher: self.teacher.clone(),
            student: self.student.clone(),
            behaviour: String::new(),
            notes: String::new(),
        }
    }
}

/// Submission state of the incident form.
///
/// Submission is synchronous and takes `&mut self`, so `Submitting` only
/// holds while [`IncidentController::submit_at`] is writing. Callers always
/// observe `Idle` between calls, whether the submission succeeded or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    /// Waiting for input.
    #[default]
    Idle,
    /// Validation passed; writes are in progress.
    Submitting,
}

/// Everything the incident form shows when it is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncidentFormState {
    /// Known teachers, file order.
    pub teachers: Roster,
    /// Known students, file order.
    pub students: Roster,
    /// Behaviour choices.
    pub behaviours: Vec<Behaviour>,
    /// Recent-incidents display lines, newest first.
    pub recent: Vec<String>,
}

/// Result of [`IncidentController::ensure_student`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentEnsured {
    /// The student roster after the call.
    pub students: Roster,
    /// Whether the name was appended by this call.
    pub created: bool,
}

/// Result of a successful incident submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    /// The stored incident.
    pub incident: Incident,
    /// The student roster after the submission.
    pub students: Roster,
    /// Whether the student was new.
    pub student_created: bool,
    /// The form contents to show next.
    pub draft: IncidentDraft,
    /// Recent-incidents display lines, newest first.
    pub recent: Vec<String>,
    /// Confirmation for the user.
    pub message: String,
}

/// Drives the incident-recording workflow against a [`Store`].
#[derive(Debug)]
pub struct IncidentController {
    store: Store,
    recent_count: usize,
    phase: FormPhase,
}

impl IncidentController {
    /// Create a controller showing `recent_count` incidents after each
    /// submission.
    #[must_use]
    pub fn new(store: Store, recent_count: usize) -> Self {
        Self {
            store,
            recent_count,
            phase: FormPhase::Idle,
        }
    }

    /// Current submission state; always [`FormPhase::Idle`] between calls.
    #[must_use]
    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Load the selectable names and the recent-incidents display.
    ///
    /// # Errors
    ///
    /// Returns an error if any data file cannot be read.
    pub fn open(&self) -> Result<IncidentFormState> {
        Ok(IncidentFormState {
            teachers: Roster::from(self.store.teachers()?),
            students: Roster::from(self.store.students()?),
            behaviours: Behaviour::ALL.to_vec(),
            recent: self.recent()?,
        })
    }

    /// The recent-incidents display lines, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the incidents file cannot be read.
    pub fn recent(&self) -> Result<Vec<String>> {
        self.store.recent_incidents(self.recent_count)
    }

    /// Make sure `student` is in the student file, appending it if absent.
    ///
    /// The student file is re-read first, so repeated calls with the same name
    /// never write it twice.
    ///
    /// # Errors
    ///
    /// Returns an error if the student file cannot be read or written.
    pub fn ensure_student(&self, student: &str) -> Result<StudentEnsured> {
        let students = Roster::from(self.store.students()?);
        if students.contains(student) {
            debug!("Student {} already known", student);
            return Ok(StudentEnsured {
                students,
                created: false,
            });
        }

        self.store.append_student(student)?;
        info!("Added new student {}", student);

        let mut names = students.names().to_vec();
        names.push(student.to_string());
        Ok(StudentEnsured {
            students: Roster::from(names),
            created: true,
        })
    }

    /// Append a validated incident to the incidents file.
    ///
    /// # Errors
    ///
    /// Returns an error if the incidents file cannot be written.
    pub fn record_incident(&self, incident: &Incident) -> Result<()> {
        self.store.append_incident(incident)
    }

    /// Submit the form using the current wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the draft is incomplete (nothing is
    /// written), or a storage error if a write fails.
    pub fn submit(&mut self, draft: &IncidentDraft) -> Result<Submission> {
        self.submit_at(draft, record::now())
    }

    /// Submit the form with an explicit timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the draft is incomplete (nothing is
    /// written), or a storage error if a write fails.
    pub fn submit_at(&mut self, draft: &IncidentDraft, timestamp: NaiveDateTime) -> Result<Submission> {
        let incident = match draft.validate(timestamp) {
            Ok(incident) => incident,
            Err(err) => {
                warn!("Incident rejected: {}", err);
                return Err(Error::Validation(err));
            }
        };

        self.phase = FormPhase::Submitting;
        let result = self.persist(draft, incident);
        self.phase = FormPhase::Idle;
        result
    }

    fn persist(&self, draft: &IncidentDraft, incident: Incident) -> Result<Submission> {
        let ensured = self.ensure_student(&incident.student)?;
        self.record_incident(&incident)?;

        let message = format!("Incident recorded for {}.", incident.student);
        Ok(Submission {
            students: ensured.students,
            student_created: ensured.created,
            draft: draft.cleared(),
            recent: self.recent()?,
            message,
            incident,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;
    use crate::record::TIMESTAMP_FORMAT;
    use crate::storage::FileKind;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap()
    }

    fn create_test_controller() -> (tempfile::TempDir, IncidentController) {
        init_test_logging();
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let store = Store::open(dir.path()).expect("failed to open store");
        (dir, IncidentController::new(store, 2))
    }

    fn incidents_file(controller: &IncidentController) -> String {
        std::fs::read_to_string(controller.store().path(FileKind::Incidents)).unwrap_or_default()
    }

    #[test]
    fn test_validate_trims_fields() {
        let draft = IncidentDraft::new("  Smith ", "Alice\t", " excellent effort ", "  tried hard \n");
        let incident = draft.validate(ts("2024-03-05 09:15:42")).unwrap();

        assert_eq!(incident.teacher, "Smith");
        assert_eq!(incident.student, "Alice");
        assert_eq!(incident.behaviour, Behaviour::ExcellentEffort);
        assert_eq!(incident.notes, "tried hard");
    }

    #[test]
    fn test_validate_reports_every_missing_field() {
        let draft = IncidentDraft::new(" ", "", "", "notes only");
        let err = draft.validate(ts("2024-03-05 09:15:42")).unwrap_err();

        assert_eq!(
            err,
            ValidationError::MissingFields(vec![Field::Teacher, Field::Student, Field::Behaviour])
        );
    }

    #[test]
    fn test_validate_unknown_behaviour() {
        let draft = IncidentDraft::new("Smith", "Alice", "Napping", "");
        let err = draft.validate(ts("2024-03-05 09:15:42")).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownBehaviour(_)));
    }

    #[test]
    fn test_cleared_keeps_teacher_and_student() {
        let draft = IncidentDraft::new("Smith", "Alice", "off-task", "phone");
        assert_eq!(draft.cleared(), IncidentDraft::new("Smith", "Alice", "", ""));
    }

    #[test]
    fn test_open_empty_store() {
        let (_dir, controller) = create_test_controller();
        let state = controller.open().unwrap();

        assert!(state.teachers.is_empty());
        assert!(state.students.is_empty());
        assert_eq!(state.behaviours.len(), 5);
        assert!(state.recent.is_empty());
    }

    #[test]
    fn test_submit_writes_header_and_one_row() {
        let (_dir, mut controller) = create_test_controller();
        let draft = IncidentDraft::new("Smith", "Alice", "Excellent Effort", "");

        let submission = controller
            .submit_at(&draft, ts("2024-03-05 09:15:42"))
            .unwrap();

        assert_eq!(
            incidents_file(&controller),
            "timestamp,teacher,student,behaviour,notes\n\
             2024-03-05 09:15:42,Smith,Alice,Excellent Effort,\n"
        );
        assert_eq!(submission.recent, vec!["2024-03-05 09:15 | Alice | Excellent Effort | "]);
        assert_eq!(submission.message, "Incident recorded for Alice.");
        assert_eq!(controller.phase(), FormPhase::Idle);
    }

    #[test]
    fn test_submit_missing_field_writes_nothing() {
        let (_dir, mut controller) = create_test_controller();
        let draft = IncidentDraft::new("Smith", "Alice", "   ", "");

        let err = controller.submit(&draft).unwrap_err();

        assert!(err.is_validation());
        assert!(!controller.store().path(FileKind::Incidents).exists());
        assert!(!controller.store().path(FileKind::Students).exists());
        assert_eq!(controller.phase(), FormPhase::Idle);
    }

    #[test]
    fn test_submit_creates_student_once() {
        let (_dir, mut controller) = create_test_controller();
        let draft = IncidentDraft::new("Smith", "Alice", "on-task", "");

        let first = controller.submit(&draft).unwrap();
        let second = controller.submit(&draft).unwrap();

        assert!(first.student_created);
        assert!(!second.student_created);
        assert_eq!(controller.store().students().unwrap(), vec!["Alice"]);
        assert_eq!(second.students.names(), ["Alice"]);
    }

    #[test]
    fn test_submit_clears_behaviour_and_notes() {
        let (_dir, mut controller) = create_test_controller();
        let draft = IncidentDraft::new("Smith", "Alice", "off-task", "phone out");

        let submission = controller.submit(&draft).unwrap();
        assert_eq!(submission.draft, IncidentDraft::new("Smith", "Alice", "", ""));
    }

    #[test]
    fn test_recent_shows_last_two_newest_first() {
        let (_dir, mut controller) = create_test_controller();
        let students = ["Alice", "Bob", "Cara", "Dev"];
        for (i, student) in students.iter().enumerate() {
            let draft = IncidentDraft::new("Smith", *student, "Excellent Effort", "");
            controller
                .submit_at(&draft, ts(&format!("2024-03-05 09:0{i}:00")))
                .unwrap();
        }

        let recent = controller.recent().unwrap();
        assert_eq!(
            recent,
            vec![
                "2024-03-05 09:03 | Dev | Excellent Effort | ",
                "2024-03-05 09:02 | Cara | Excellent Effort | ",
            ]
        );
    }

    #[test]
    fn test_ensure_student_alone() {
        let (_dir, controller) = create_test_controller();

        let ensured = controller.ensure_student("Alice").unwrap();
        assert!(ensured.created);
        assert_eq!(ensured.students.names(), ["Alice"]);
        assert!(!controller.store().path(FileKind::Incidents).exists());

        let again = controller.ensure_student("Alice").unwrap();
        assert!(!again.created);
        assert_eq!(controller.store().students().unwrap(), vec!["Alice"]);
    }

    #[test]
    fn test_record_incident_alone_does_not_touch_students() {
        let (_dir, controller) = create_test_controller();
        let incident = IncidentDraft::new("Smith", "Alice", "disruptive", "")
            .validate(ts("2024-03-05 09:15:42"))
            .unwrap();

        controller.record_incident(&incident).unwrap();

        assert_eq!(controller.store().incidents().unwrap(), vec![incident]);
        assert!(!controller.store().path(FileKind::Students).exists());
    }

    #[test]
    fn test_storage_failure_propagates_and_resets_phase() {
        let (dir, mut controller) = create_test_controller();
        // Replace the data directory with a file so every append fails.
        std::fs::remove_dir_all(dir.path()).unwrap();
        std::fs::write(dir.path(), "not a directory").unwrap();

        let err = controller
            .submit(&IncidentDraft::new("Smith", "Alice", "on-task", ""))
            .unwrap_err();

        assert!(err.is_storage());
        assert_eq!(controller.phase(), FormPhase::Idle);
        std::fs::remove_file(dir.path()).unwrap();
    }
}
