//! Core engine for the work log.
//! This crate owns the task table, its storage, search and paging rules;
//! it never prints, leaving rendering to the shell.

pub mod logging;
pub mod model;
pub mod pager;
pub mod search;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::table::{Table, TableRow};
pub use model::task::{
    coerce_date, coerce_duration, coerce_title, format_date, FieldValue, Task, TaskField,
    ValidationError, DATE_FORMAT, FIELD_NAMES,
};
pub use pager::{Pager, PagerAction, PagerError, PagerNotice, PagerResult, PagerState};
pub use search::query::{distinct_dates, filter, SearchMode, SearchQuery};
pub use search::{SearchError, SearchResult};
pub use service::work_log_service::WorkLogService;
pub use store::csv_store::{CsvRecordStore, DEFAULT_FILE_NAME};
pub use store::memory_store::MemoryRecordStore;
pub use store::{RecordStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
