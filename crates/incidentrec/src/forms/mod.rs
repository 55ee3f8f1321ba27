//! Form controllers.
//!
//! Each controller follows the same command shape: validate the raw field
//! values, persist through the [`Store`](crate::storage::Store), then return
//! fresh state for the caller to display. Controllers hold no name lists of
//! their own; rosters are passed back to the caller as values.

mod incident;
mod teacher;

use std::collections::BTreeSet;

use serde::Serialize;

pub use incident::{
    FormPhase, IncidentController, IncidentDraft, IncidentFormState, StudentEnsured, Submission,
};
pub use teacher::{TeacherController, TeacherSaved};

/// An ordered list of names read from a single-column file.
///
/// Order is file order. Duplicates are kept exactly as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    /// Names in file order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Check whether `name` is present (exact match).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Sorted, de-duplicated names for a selection list.
    #[must_use]
    pub fn choices(&self) -> Vec<String> {
        self.names
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of stored names, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl From<Vec<String>> for Roster {
    fn from(names: Vec<String>) -> Self {
        Self { names }
    }
}

/// Trim a raw field value.
fn clean(value: &str) -> String {
    value.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(names: &[&str]) -> Roster {
        Roster::from(names.iter().map(ToString::to_string).collect::<Vec<_>>())
    }

    #[test]
    fn test_roster_keeps_order_and_duplicates() {
        let r = roster(&["Smith", "Jones", "Smith"]);
        assert_eq!(r.names(), ["Smith", "Jones", "Smith"]);
        assert_eq!(r.len(), 3);
    }

    #[test]
    fn test_roster_choices_sorted_unique() {
        let r = roster(&["Smith", "Jones", "Smith", "Adams"]);
        assert_eq!(r.choices(), vec!["Adams", "Jones", "Smith"]);
    }

    #[test]
    fn test_roster_contains_is_exact() {
        let r = roster(&["Alice"]);
        assert!(r.contains("Alice"));
        assert!(!r.contains("alice"));
        assert!(!r.contains("Alice "));
    }

    #[test]
    fn test_empty_roster() {
        let r = Roster::default();
        assert!(r.is_empty());
        assert!(r.choices().is_empty());
    }

    #[test]
    fn test_roster_serializes_as_list() {
        let json = serde_json::to_string(&roster(&["A", "B"])).unwrap();
        assert_eq!(json, r#"["A","B"]"#);
    }
}
