//! Record store contracts and file-backed persistence.
//!
//! # Responsibility
//! - Load and save the whole work log table.
//! - Own the on-disk layout (`date,title,duration,notes` CSV).
//!
//! # Invariants
//! - Every save is a full rewrite; readers never observe a partial table.
//! - A missing backing resource loads as an empty table.
//! - Load rejects corrupt persisted rows instead of skipping them.

pub mod csv_store;
pub mod memory_store;

use crate::model::table::Table;
use crate::model::task::Task;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage failure; fatal for the current operation.
#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Csv(csv::Error),
    InvalidHeader {
        found: Vec<String>,
    },
    InvalidData {
        line: u64,
        message: String,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "work log `{}`: {source}", path.display()),
            Self::Csv(err) => write!(f, "{err}"),
            Self::InvalidHeader { found } => write!(
                f,
                "unexpected work log header `{}`; expected `date,title,duration,notes`",
                found.join(",")
            ),
            Self::InvalidData { line, message } => {
                write!(f, "invalid work log row at line {line}: {message}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv(err) => Some(err),
            Self::InvalidHeader { .. } => None,
            Self::InvalidData { .. } => None,
        }
    }
}

impl From<csv::Error> for StoreError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// Whole-table persistence contract.
///
/// Implementations are read-modify-write only; there is no partial update
/// path and no concurrency guard (last writer wins).
pub trait RecordStore {
    /// Loads the current table, or an empty one if nothing was stored yet.
    fn load(&self) -> StoreResult<Table>;
    /// Replaces the stored table with `table`.
    fn save(&self, table: &Table) -> StoreResult<()>;
    /// Creates an empty table with the canonical header if absent or empty.
    fn ensure_initialized(&self) -> StoreResult<()>;
    /// Whether the backing resource exists at all.
    fn exists(&self) -> bool;

    /// Appends one task, creating the store if needed.
    fn append(&self, task: Task) -> StoreResult<usize> {
        self.ensure_initialized()?;
        let mut table = self.load()?;
        table.push(task);
        self.save(&table)?;
        Ok(table.len() - 1)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn load(&self) -> StoreResult<Table> {
        (**self).load()
    }

    fn save(&self, table: &Table) -> StoreResult<()> {
        (**self).save(table)
    }

    fn ensure_initialized(&self) -> StoreResult<()> {
        (**self).ensure_initialized()
    }

    fn exists(&self) -> bool {
        (**self).exists()
    }

    fn append(&self, task: Task) -> StoreResult<usize> {
        (**self).append(task)
    }
}
