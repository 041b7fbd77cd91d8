//! Work log use-case service.
//!
//! # Responsibility
//! - Provide add/search/page entry points for the shell.
//! - Reload the table from storage for every operation.
//!
//! # Invariants
//! - No table is cached between calls; storage is always the source of truth.
//! - Service APIs never bypass store persistence contracts.

use crate::model::table::{Table, TableRow};
use crate::model::task::Task;
use crate::pager::Pager;
use crate::search::query::{distinct_dates, filter, SearchQuery};
use crate::search::SearchResult;
use crate::store::{RecordStore, StoreResult};
use chrono::NaiveDate;
use log::info;

pub struct WorkLogService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> WorkLogService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether anything has been logged yet (the backing resource exists).
    pub fn has_log(&self) -> bool {
        self.store.exists()
    }

    /// Appends one validated task, creating the store if absent.
    ///
    /// Returns the persisted position of the new task.
    pub fn add(&self, task: Task) -> StoreResult<usize> {
        let position = self.store.append(task)?;
        info!("event=task_add module=service status=ok position={position}");
        Ok(position)
    }

    pub fn load(&self) -> StoreResult<Table> {
        self.store.load()
    }

    /// Dates offered by the exact-date search menu.
    pub fn distinct_dates(&self) -> StoreResult<Vec<NaiveDate>> {
        Ok(distinct_dates(&self.store.load()?))
    }

    /// Loads the current table and filters it.
    pub fn search(&self, query: &SearchQuery) -> SearchResult<Vec<TableRow>> {
        let table = self.store.load()?;
        let rows = filter(&table, query)?;
        info!(
            "event=search module=service status=ok mode={} hits={}",
            query.mode().as_str(),
            rows.len()
        );
        Ok(rows)
    }

    /// Starts paging `rows`, persisting edits through this service's store.
    pub fn pager(&self, rows: Vec<TableRow>) -> Pager<&S> {
        Pager::new(&self.store, rows)
    }
}
