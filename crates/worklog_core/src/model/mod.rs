//! Work log domain model.
//!
//! # Responsibility
//! - Define the canonical task record stored in the work log table.
//! - Own field coercion rules shared by task creation and editing.
//!
//! # Invariants
//! - Identity is positional: a task is addressed by its row in the table.
//! - Serialized field order is always `date, title, duration, notes`.

pub mod task;
pub mod table;
