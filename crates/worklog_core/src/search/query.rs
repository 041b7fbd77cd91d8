//! Search predicates over the work log table.
//!
//! # Responsibility
//! - Provide the five search modes offered by the search menu.
//! - Return matching rows with their persisted positions.
//!
//! # Invariants
//! - Keyword search is an unanchored, case-sensitive substring test.
//! - Pattern search matches from the start of a field but need not consume
//!   the whole field.
//! - Both text modes look at every field's string form (`Task::field_text`).
//! - Date ranges are inclusive and order-insensitive.

use crate::model::table::{Table, TableRow};
use crate::model::task::{coerce_date, coerce_duration, Task, TaskField, ValidationError};
use chrono::NaiveDate;
use log::debug;
use regex::Regex;
use std::collections::BTreeSet;

/// Search menu choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    ExactDate,
    ExactDuration,
    Keyword,
    Pattern,
    DateRange,
}

impl SearchMode {
    pub const ALL: [SearchMode; 5] = [
        SearchMode::ExactDate,
        SearchMode::ExactDuration,
        SearchMode::Keyword,
        SearchMode::Pattern,
        SearchMode::DateRange,
    ];

    /// Menu key: `d`ate, dura`t`ion, `k`eyword, regex `p`attern, date `r`ange.
    pub fn menu_key(self) -> char {
        match self {
            Self::ExactDate => 'd',
            Self::ExactDuration => 't',
            Self::Keyword => 'k',
            Self::Pattern => 'p',
            Self::DateRange => 'r',
        }
    }

    pub fn from_menu_input(input: &str) -> Option<Self> {
        let normalized = input.trim().to_ascii_lowercase();
        let mut chars = normalized.chars();
        let key = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::ALL.into_iter().find(|mode| mode.menu_key() == key)
    }

    /// Stable name for log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExactDate => "exact_date",
            Self::ExactDuration => "exact_duration",
            Self::Keyword => "keyword",
            Self::Pattern => "pattern",
            Self::DateRange => "date_range",
        }
    }
}

/// A parsed search predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    ExactDate(NaiveDate),
    ExactDuration(u32),
    Keyword(String),
    Pattern(String),
    /// Inclusive on both ends.
    DateRange {
        from: NaiveDate,
        to: NaiveDate,
    },
}

impl SearchQuery {
    pub fn mode(&self) -> SearchMode {
        match self {
            Self::ExactDate(_) => SearchMode::ExactDate,
            Self::ExactDuration(_) => SearchMode::ExactDuration,
            Self::Keyword(_) => SearchMode::Keyword,
            Self::Pattern(_) => SearchMode::Pattern,
            Self::DateRange { .. } => SearchMode::DateRange,
        }
    }

    /// Resolves a 1-based selection from the list produced by
    /// [`distinct_dates`].
    pub fn exact_date(dates: &[NaiveDate], choice: &str) -> Result<Self, ValidationError> {
        let trimmed = choice.trim();
        let invalid = || ValidationError::InvalidChoice {
            input: trimmed.to_string(),
            max: dates.len(),
        };
        let index = trimmed.parse::<usize>().map_err(|_| invalid())?;
        if index == 0 {
            return Err(invalid());
        }
        dates
            .get(index - 1)
            .copied()
            .map(Self::ExactDate)
            .ok_or_else(invalid)
    }

    pub fn exact_duration(raw: &str) -> Result<Self, ValidationError> {
        coerce_duration(raw).map(Self::ExactDuration)
    }

    pub fn keyword(raw: &str) -> Self {
        Self::Keyword(raw.to_string())
    }

    /// Validates the pattern eagerly so the caller can re-prompt before
    /// filtering.
    pub fn pattern(raw: &str) -> Result<Self, ValidationError> {
        compile_pattern(raw)?;
        Ok(Self::Pattern(raw.to_string()))
    }

    /// Parses both ends and swaps them when `to` is earlier than `from`.
    pub fn date_range(from: &str, to: &str) -> Result<Self, ValidationError> {
        let from = coerce_date(from)?;
        let to = coerce_date(to)?;
        Ok(Self::between(from, to))
    }

    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        if to < from {
            Self::DateRange { from: to, to: from }
        } else {
            Self::DateRange { from, to }
        }
    }
}

/// Lists every date present in `table`, de-duplicated and ascending.
pub fn distinct_dates(table: &Table) -> Vec<NaiveDate> {
    table
        .tasks()
        .iter()
        .map(|task| task.date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Returns the rows of `table` matching `query`, in table order.
///
/// # Errors
/// - `ValidationError::InvalidPattern` when a pattern query does not compile.
pub fn filter(table: &Table, query: &SearchQuery) -> Result<Vec<TableRow>, ValidationError> {
    let matcher = Matcher::new(query)?;
    let hits = table
        .rows()
        .filter(|row| matcher.matches(&row.task))
        .collect::<Vec<_>>();

    debug!(
        "event=search_filter module=search status=ok mode={} rows={} hits={}",
        query.mode().as_str(),
        table.len(),
        hits.len()
    );
    Ok(hits)
}

enum Matcher<'q> {
    Date(NaiveDate),
    Duration(u32),
    Keyword(&'q str),
    Pattern(Regex),
    Range(NaiveDate, NaiveDate),
}

impl<'q> Matcher<'q> {
    fn new(query: &'q SearchQuery) -> Result<Self, ValidationError> {
        Ok(match query {
            SearchQuery::ExactDate(date) => Self::Date(*date),
            SearchQuery::ExactDuration(minutes) => Self::Duration(*minutes),
            SearchQuery::Keyword(keyword) => Self::Keyword(keyword.as_str()),
            SearchQuery::Pattern(pattern) => Self::Pattern(compile_pattern(pattern)?),
            SearchQuery::DateRange { from, to } => {
                Self::Range((*from).min(*to), (*from).max(*to))
            }
        })
    }

    fn matches(&self, task: &Task) -> bool {
        match self {
            Self::Date(date) => task.date == *date,
            Self::Duration(minutes) => task.duration == *minutes,
            Self::Keyword(keyword) => any_field(task, |text| text.contains(*keyword)),
            Self::Pattern(regex) => any_field(task, |text| matches_at_start(regex, text)),
            Self::Range(from, to) => (*from..=*to).contains(&task.date),
        }
    }
}

fn any_field(task: &Task, predicate: impl Fn(&str) -> bool) -> bool {
    TaskField::ALL
        .into_iter()
        .any(|field| predicate(&task.field_text(field)))
}

// Leftmost-first search: if any match starts at 0, `find` reports it.
fn matches_at_start(regex: &Regex, text: &str) -> bool {
    regex.find(text).is_some_and(|found| found.start() == 0)
}

fn compile_pattern(pattern: &str) -> Result<Regex, ValidationError> {
    Regex::new(pattern).map_err(|err| ValidationError::InvalidPattern {
        pattern: pattern.to_string(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{matches_at_start, SearchMode};
    use regex::Regex;

    #[test]
    fn anchored_start_does_not_require_full_match() {
        let regex = Regex::new("Fix").unwrap();
        assert!(matches_at_start(&regex, "Fix bug"));
        assert!(!matches_at_start(&regex, "Hotfix: Fix bug"));
    }

    #[test]
    fn anchored_start_rejects_trailing_substring() {
        let regex = Regex::new("30").unwrap();
        assert!(!matches_at_start(&regex, "130"));
    }

    #[test]
    fn search_mode_keys_are_unique() {
        for mode in SearchMode::ALL {
            let key = mode.menu_key().to_string();
            assert_eq!(SearchMode::from_menu_input(&key), Some(mode));
            assert_eq!(
                SearchMode::from_menu_input(&key.to_ascii_uppercase()),
                Some(mode)
            );
        }
        assert_eq!(SearchMode::from_menu_input("x"), None);
        assert_eq!(SearchMode::from_menu_input(""), None);
    }
}
