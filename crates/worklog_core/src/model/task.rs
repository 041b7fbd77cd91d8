//! Task domain model.
//!
//! # Responsibility
//! - Define the record appended to the work log (date, title, duration, notes).
//! - Coerce raw user input into typed field values.
//!
//! # Invariants
//! - `Task` stores what it is given. The non-empty title rule is enforced by
//!   [`coerce_title`], which callers loop on before constructing a task.
//! - Dates always round-trip through [`DATE_FORMAT`].
//! - Missing `notes` deserialize as an empty string.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Canonical on-disk and display format for task dates (`DD/MM/YYYY`).
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Canonical column layout of the persisted table.
pub const FIELD_NAMES: [&str; 4] = ["date", "title", "duration", "notes"];

/// One logged unit of completed work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    pub title: String,
    /// Whole minutes spent on the task.
    pub duration: u32,
    #[serde(default)]
    pub notes: String,
}

impl Task {
    pub fn new(
        date: NaiveDate,
        title: impl Into<String>,
        duration: u32,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            date,
            title: title.into(),
            duration,
            notes: notes.into(),
        }
    }

    /// Builds a task from four raw inputs using the same coercion rules the
    /// interactive prompts apply.
    ///
    /// # Errors
    /// - Returns the first field that fails coercion, in canonical order.
    pub fn from_raw(
        date: &str,
        title: &str,
        duration: &str,
        notes: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            date: coerce_date(date)?,
            title: coerce_title(title)?,
            duration: coerce_duration(duration)?,
            notes: notes.to_string(),
        })
    }

    /// Returns the string form of one field, as used by keyword and pattern
    /// search.
    pub fn field_text(&self, field: TaskField) -> String {
        match field {
            TaskField::Date => format_date(self.date),
            TaskField::Title => self.title.clone(),
            TaskField::Duration => self.duration.to_string(),
            TaskField::Notes => self.notes.clone(),
        }
    }

    /// Replaces exactly one field with an already-coerced value.
    pub fn apply(&mut self, value: FieldValue) {
        match value {
            FieldValue::Date(date) => self.date = date,
            FieldValue::Title(title) => self.title = title,
            FieldValue::Duration(minutes) => self.duration = minutes,
            FieldValue::Notes(notes) => self.notes = notes,
        }
    }
}

/// Closed set of editable task fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskField {
    Date,
    Title,
    Duration,
    Notes,
}

impl TaskField {
    /// All fields in canonical column order.
    pub const ALL: [TaskField; 4] = [
        TaskField::Date,
        TaskField::Title,
        TaskField::Duration,
        TaskField::Notes,
    ];

    /// Column name in the persisted table.
    pub fn column_name(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Title => "title",
            Self::Duration => "duration",
            Self::Notes => "notes",
        }
    }

    /// Menu key used by the edit prompt: `d`, `t`, `u` (duration), `n`.
    pub fn menu_key(self) -> char {
        match self {
            Self::Date => 'd',
            Self::Title => 't',
            Self::Duration => 'u',
            Self::Notes => 'n',
        }
    }

    /// Resolves an edit-menu selection, ignoring case and surrounding space.
    pub fn from_menu_input(input: &str) -> Option<Self> {
        let normalized = input.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| normalized.len() == 1 && normalized.starts_with(field.menu_key()))
    }

    /// Coerces raw input using this field's rule.
    pub fn coerce(self, raw: &str) -> Result<FieldValue, ValidationError> {
        match self {
            Self::Date => coerce_date(raw).map(FieldValue::Date),
            Self::Title => coerce_title(raw).map(FieldValue::Title),
            Self::Duration => coerce_duration(raw).map(FieldValue::Duration),
            Self::Notes => Ok(FieldValue::Notes(raw.to_string())),
        }
    }
}

impl Display for TaskField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Coerced replacement value for a single [`TaskField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Date(NaiveDate),
    Title(String),
    Duration(u32),
    Notes(String),
}

impl FieldValue {
    pub fn field(&self) -> TaskField {
        match self {
            Self::Date(_) => TaskField::Date,
            Self::Title(_) => TaskField::Title,
            Self::Duration(_) => TaskField::Duration,
            Self::Notes(_) => TaskField::Notes,
        }
    }
}

/// Rejected user input, recovered by re-prompting for the offending value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidDate { input: String },
    InvalidDuration { input: String },
    EmptyTitle,
    InvalidPattern { pattern: String, message: String },
    /// A numbered menu selection outside `1..=max`, or not a number.
    InvalidChoice { input: String, max: usize },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate { input } => {
                write!(f, "couldn't convert `{input}` into a DD/MM/YYYY date")
            }
            Self::InvalidDuration { input } => {
                write!(f, "duration `{input}` is not a whole number of minutes")
            }
            Self::EmptyTitle => write!(f, "task title is required"),
            Self::InvalidPattern { pattern, message } => {
                write!(f, "invalid regex pattern `{pattern}`: {message}")
            }
            Self::InvalidChoice { input, max } => {
                write!(f, "invalid selection `{input}`; expected a number from 1 to {max}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Parses a `DD/MM/YYYY` date.
pub fn coerce_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        input: trimmed.to_string(),
    })
}

/// Accepts any title with at least one non-whitespace character.
pub fn coerce_title(raw: &str) -> Result<String, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(raw.to_string())
}

/// Parses whole, non-negative minutes.
pub fn coerce_duration(raw: &str) -> Result<u32, ValidationError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidDuration {
            input: trimmed.to_string(),
        })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

mod date_format {
    use super::DATE_FORMAT;
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
            .map_err(|err| de::Error::custom(format!("invalid date `{raw}`: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::{coerce_date, coerce_duration, coerce_title, TaskField, ValidationError};

    #[test]
    fn coerce_date_accepts_unpadded_day_and_month() {
        let date = coerce_date(" 5/5/2024 ").unwrap();
        assert_eq!(date.to_string(), "2024-05-05");
    }

    #[test]
    fn coerce_date_rejects_iso_format() {
        let err = coerce_date("2024-05-05").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDate { .. }));
    }

    #[test]
    fn coerce_duration_rejects_decimals_and_negatives() {
        assert!(coerce_duration("1.5").is_err());
        assert!(coerce_duration("-3").is_err());
        assert_eq!(coerce_duration(" 45 ").unwrap(), 45);
    }

    #[test]
    fn coerce_title_rejects_blank() {
        assert_eq!(coerce_title("   "), Err(ValidationError::EmptyTitle));
        assert_eq!(coerce_title("Fix bug").unwrap(), "Fix bug");
    }

    #[test]
    fn menu_keys_resolve_case_insensitively() {
        assert_eq!(TaskField::from_menu_input("U"), Some(TaskField::Duration));
        assert_eq!(TaskField::from_menu_input(" d "), Some(TaskField::Date));
        assert_eq!(TaskField::from_menu_input("x"), None);
        assert_eq!(TaskField::from_menu_input("dd"), None);
    }
}
