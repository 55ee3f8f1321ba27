//! Core record types for incidentrec.
//!
//! This module defines the incident record, the closed set of behaviour
//! categories, and the timestamp format used in the incidents file.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Timestamp format stored in the incidents file.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Number of timestamp characters shown in the recent-incidents display
/// (date plus hours and minutes).
pub const DISPLAY_TIMESTAMP_LEN: usize = 16;

/// One of the five observed-conduct categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Behaviour {
    /// On-Task / Participating.
    #[serde(rename = "On-Task / Participating")]
    OnTask,
    /// Prepared & Helping Others.
    #[serde(rename = "Prepared & Helping Others")]
    HelpingOthers,
    /// Excellent Effort.
    #[serde(rename = "Excellent Effort")]
    ExcellentEffort,
    /// Off-Task / Distracted.
    #[serde(rename = "Off-Task / Distracted")]
    OffTask,
    /// Disruptive / Calling Out.
    #[serde(rename = "Disruptive / Calling Out")]
    Disruptive,
}

impl Behaviour {
    /// All categories, in display order.
    pub const ALL: [Self; 5] = [
        Self::OnTask,
        Self::HelpingOthers,
        Self::ExcellentEffort,
        Self::OffTask,
        Self::Disruptive,
    ];

    /// The label written to the incidents file.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::OnTask => "On-Task / Participating",
            Self::HelpingOthers => "Prepared & Helping Others",
            Self::ExcellentEffort => "Excellent Effort",
            Self::OffTask => "Off-Task / Distracted",
            Self::Disruptive => "Disruptive / Calling Out",
        }
    }

    /// Short key accepted on the command line.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::OnTask => "on-task",
            Self::HelpingOthers => "helping-others",
            Self::ExcellentEffort => "excellent-effort",
            Self::OffTask => "off-task",
            Self::Disruptive => "disruptive",
        }
    }

    /// Whether this category describes positive conduct.
    #[must_use]
    pub fn is_positive(self) -> bool {
        matches!(
            self,
            Self::OnTask | Self::HelpingOthers | Self::ExcellentEffort
        )
    }
}

impl fmt::Display for Behaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Behaviour {
    type Err = ValidationError;

    /// Parse a label (case-insensitive) or short key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|b| b.label().eq_ignore_ascii_case(wanted) || b.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownBehaviour(wanted.to_string()))
    }
}

/// A single recorded incident.
///
/// Field order matches the column order of the incidents file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incident {
    /// When the incident was submitted (local wall-clock, second resolution).
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,
    /// The teacher recording the incident.
    pub teacher: String,
    /// The student the incident is about.
    pub student: String,
    /// The observed behaviour.
    pub behaviour: Behaviour,
    /// Free-text notes; may be empty.
    pub notes: String,
}

impl Incident {
    /// Create an incident stamped with the current local time.
    #[must_use]
    pub fn new(teacher: String, student: String, behaviour: Behaviour, notes: String) -> Self {
        Self::at(now(), teacher, student, behaviour, notes)
    }

    /// Create an incident with an explicit timestamp.
    #[must_use]
    pub fn at(
        timestamp: NaiveDateTime,
        teacher: String,
        student: String,
        behaviour: Behaviour,
        notes: String,
    ) -> Self {
        Self {
            timestamp,
            teacher,
            student,
            behaviour,
            notes,
        }
    }

    /// The timestamp as written to the incidents file.
    #[must_use]
    pub fn timestamp_string(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// The row written to the incidents file.
    #[must_use]
    pub fn to_row(&self) -> [String; 5] {
        [
            self.timestamp_string(),
            self.teacher.clone(),
            self.student.clone(),
            self.behaviour.label().to_string(),
            self.notes.clone(),
        ]
    }
}

/// Current local time truncated to whole seconds.
#[must_use]
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Serde adapter for the incidents-file timestamp format.
mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&ts.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).map_err(de::Error::custom)
    }
}
