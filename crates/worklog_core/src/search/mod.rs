//! Table query engine.
//!
//! # Responsibility
//! - Filter an in-memory table by one search predicate.
//! - Parse raw search parameters into typed queries.
//!
//! # Invariants
//! - Results keep table order and carry persisted positions.
//! - Empty results are valid; only malformed parameters are errors.

pub mod query;

use crate::model::task::ValidationError;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SearchResult<T> = Result<T, SearchError>;

/// Failure while loading and filtering the stored table.
#[derive(Debug)]
pub enum SearchError {
    /// Malformed search parameter; the caller should re-prompt.
    Validation(ValidationError),
    Store(StoreError),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ValidationError> for SearchError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for SearchError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
