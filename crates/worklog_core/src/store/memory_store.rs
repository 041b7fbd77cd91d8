//! In-memory record store.
//!
//! Mirrors the file store's whole-table semantics without touching disk.
//! Used by tests and by callers that embed the engine.

use super::{RecordStore, StoreResult};
use crate::model::table::Table;
use std::cell::{Cell, RefCell};

#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    table: RefCell<Table>,
    initialized: Cell<bool>,
    saves: Cell<usize>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an initialized store holding `table`.
    pub fn with_table(table: Table) -> Self {
        Self {
            table: RefCell::new(table),
            initialized: Cell::new(true),
            saves: Cell::new(0),
        }
    }

    /// Number of full-table saves performed so far.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    /// Replaces the stored table without counting a save, simulating an
    /// edit made outside the current session.
    pub fn replace_externally(&self, table: Table) {
        *self.table.borrow_mut() = table;
        self.initialized.set(true);
    }
}

impl RecordStore for MemoryRecordStore {
    fn load(&self) -> StoreResult<Table> {
        Ok(self.table.borrow().clone())
    }

    fn save(&self, table: &Table) -> StoreResult<()> {
        *self.table.borrow_mut() = table.clone();
        self.initialized.set(true);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn ensure_initialized(&self) -> StoreResult<()> {
        self.initialized.set(true);
        Ok(())
    }

    fn exists(&self) -> bool {
        self.initialized.get()
    }
}
