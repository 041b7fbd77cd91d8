//! In-memory work log table.
//!
//! # Invariants
//! - Row order is storage order; nothing in core re-sorts a table.
//! - `TableRow::position` is the index in the full table, independent of any
//!   filtered subset the row appears in.

use super::task::{FieldValue, Task};

/// Full ordered set of persisted tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    tasks: Vec<Task>,
}

/// A task paired with its persisted position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub position: usize,
    pub task: Task,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Task> {
        self.tasks.get(position)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    /// Iterates tasks together with their persisted positions.
    pub fn rows(&self) -> impl Iterator<Item = TableRow> + '_ {
        self.tasks
            .iter()
            .enumerate()
            .map(|(position, task)| TableRow {
                position,
                task: task.clone(),
            })
    }

    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Removes the task at `position`, shifting later rows up by one.
    ///
    /// Returns `None` when `position` is out of bounds.
    pub fn remove(&mut self, position: usize) -> Option<Task> {
        if position >= self.tasks.len() {
            return None;
        }
        Some(self.tasks.remove(position))
    }

    /// Overwrites one field of the task at `position`.
    ///
    /// Returns the updated task, or `None` when `position` is out of bounds.
    pub fn apply(&mut self, position: usize, value: FieldValue) -> Option<&Task> {
        let task = self.tasks.get_mut(position)?;
        task.apply(value);
        Some(task)
    }
}

impl From<Vec<Task>> for Table {
    fn from(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }
}

impl FromIterator<Task> for Table {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        Self {
            tasks: iter.into_iter().collect(),
        }
    }
}
