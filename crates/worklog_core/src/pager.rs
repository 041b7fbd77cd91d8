//! Result pager and in-place editor.
//!
//! # Responsibility
//! - Walk a search result one task at a time.
//! - Edit one field or delete the current task, persisting through the store.
//!
//! # Invariants
//! - Edits and deletes target the row's persisted position, never its index
//!   within the result.
//! - Every mutation reloads the table fresh, mutates it, then saves the whole
//!   table.
//! - After a delete the result is stale; only `acknowledge` is accepted.
//! - Unrecognized input never changes state; it only sets a notice.

use crate::model::table::TableRow;
use crate::model::task::{TaskField, ValidationError};
use crate::store::{RecordStore, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PagerResult<T> = Result<T, PagerError>;

#[derive(Debug)]
pub enum PagerError {
    /// Replacement value failed coercion; the pager stays in `Editing`.
    Validation(ValidationError),
    Store(StoreError),
    /// The persisted position no longer exists in the freshly loaded table.
    StalePosition { position: usize, len: usize },
    InvalidState { state: PagerState, action: &'static str },
}

impl Display for PagerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::StalePosition { position, len } => write!(
                f,
                "task #{position} no longer exists; the work log now has {len} tasks"
            ),
            Self::InvalidState { state, action } => {
                write!(f, "cannot {action} while pager is {state:?}")
            }
        }
    }
}

impl Error for PagerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::StalePosition { .. } => None,
            Self::InvalidState { .. } => None,
        }
    }
}

impl From<ValidationError> for PagerError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for PagerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    /// Showing the result at this index.
    Viewing(usize),
    /// Waiting for a field and replacement value for the result at this index.
    Editing(usize),
    /// Current task was deleted; waiting for acknowledgement.
    Deleted,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerAction {
    Edit,
    Delete,
    Next,
    Previous,
    Back,
}

impl PagerAction {
    pub fn menu_key(self) -> char {
        match self {
            Self::Edit => 'e',
            Self::Delete => 'd',
            Self::Next => 'n',
            Self::Previous => 'p',
            Self::Back => 'b',
        }
    }

    pub fn from_menu_input(input: &str) -> Option<Self> {
        let normalized = input.trim().to_ascii_lowercase();
        [
            Self::Edit,
            Self::Delete,
            Self::Next,
            Self::Previous,
            Self::Back,
        ]
        .into_iter()
        .find(|action| normalized.len() == 1 && normalized.starts_with(action.menu_key()))
    }
}

/// Feedback for the caller to render alongside the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagerNotice {
    ChoiceNotRecognized,
    TaskUpdated(TaskField),
}

/// State machine over a fixed search result.
pub struct Pager<S: RecordStore> {
    store: S,
    rows: Vec<TableRow>,
    state: PagerState,
    notice: Option<PagerNotice>,
}

impl<S: RecordStore> Pager<S> {
    /// Starts viewing the first row, or `Done` for an empty result.
    pub fn new(store: S, rows: Vec<TableRow>) -> Self {
        let state = if rows.is_empty() {
            PagerState::Done
        } else {
            PagerState::Viewing(0)
        };
        Self {
            store,
            rows,
            state,
            notice: None,
        }
    }

    pub fn state(&self) -> PagerState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == PagerState::Done
    }

    /// Row under the cursor while viewing or editing.
    pub fn current(&self) -> Option<&TableRow> {
        match self.state {
            PagerState::Viewing(index) | PagerState::Editing(index) => self.rows.get(index),
            PagerState::Deleted | PagerState::Done => None,
        }
    }

    pub fn notice(&self) -> Option<&PagerNotice> {
        self.notice.as_ref()
    }

    /// Actions valid from the current state. `Next`/`Previous` appear only
    /// when a neighbour exists in that direction.
    pub fn available_actions(&self) -> Vec<PagerAction> {
        let PagerState::Viewing(index) = self.state else {
            return Vec::new();
        };
        let mut actions = vec![PagerAction::Edit, PagerAction::Delete];
        if index + 1 < self.rows.len() {
            actions.push(PagerAction::Next);
        }
        if index > 0 {
            actions.push(PagerAction::Previous);
        }
        actions.push(PagerAction::Back);
        actions
    }

    /// Interprets one line of menu input while viewing.
    ///
    /// Unknown or currently unavailable choices keep the state and set
    /// [`PagerNotice::ChoiceNotRecognized`].
    pub fn handle_input(&mut self, input: &str) -> PagerResult<PagerState> {
        match PagerAction::from_menu_input(input) {
            Some(action) if self.available_actions().contains(&action) => self.apply(action),
            _ => {
                self.notice = Some(PagerNotice::ChoiceNotRecognized);
                Ok(self.state)
            }
        }
    }

    pub fn apply(&mut self, action: PagerAction) -> PagerResult<PagerState> {
        if !self.available_actions().contains(&action) {
            return Err(PagerError::InvalidState {
                state: self.state,
                action: action_name(action),
            });
        }
        let PagerState::Viewing(index) = self.state else {
            return Err(PagerError::InvalidState {
                state: self.state,
                action: action_name(action),
            });
        };

        self.notice = None;
        self.state = match action {
            PagerAction::Next => PagerState::Viewing(index + 1),
            PagerAction::Previous => PagerState::Viewing(index - 1),
            PagerAction::Edit => PagerState::Editing(index),
            PagerAction::Delete => {
                self.delete_at(index)?;
                PagerState::Deleted
            }
            PagerAction::Back => PagerState::Done,
        };
        Ok(self.state)
    }

    /// Overwrites one field of the task being edited and returns to viewing
    /// it.
    ///
    /// # Errors
    /// - `Validation` when `raw` fails the field's coercion; state stays
    ///   `Editing` so the caller can re-prompt.
    /// - `StalePosition` when the row vanished from storage; nothing is saved.
    pub fn edit(&mut self, field: TaskField, raw: &str) -> PagerResult<PagerState> {
        let PagerState::Editing(index) = self.state else {
            return Err(PagerError::InvalidState {
                state: self.state,
                action: "edit",
            });
        };
        let value = field.coerce(raw)?;
        let position = self.rows[index].position;

        let mut table = self.store.load()?;
        let len = table.len();
        let Some(updated) = table.apply(position, value).cloned() else {
            warn!(
                "event=task_edit module=pager status=error position={position} \
                 error_code=stale_position"
            );
            return Err(PagerError::StalePosition { position, len });
        };
        self.store.save(&table)?;

        info!("event=task_edit module=pager status=ok position={position} field={field}");
        self.rows[index].task = updated;
        self.notice = Some(PagerNotice::TaskUpdated(field));
        self.state = PagerState::Viewing(index);
        Ok(self.state)
    }

    /// Leaves the edit prompt without changing anything.
    pub fn cancel_edit(&mut self) -> PagerResult<PagerState> {
        let PagerState::Editing(index) = self.state else {
            return Err(PagerError::InvalidState {
                state: self.state,
                action: "cancel edit",
            });
        };
        self.state = PagerState::Viewing(index);
        Ok(self.state)
    }

    /// Confirms a delete and finishes paging.
    pub fn acknowledge(&mut self) -> PagerResult<PagerState> {
        if self.state != PagerState::Deleted {
            return Err(PagerError::InvalidState {
                state: self.state,
                action: "acknowledge",
            });
        }
        self.state = PagerState::Done;
        Ok(self.state)
    }

    fn delete_at(&mut self, index: usize) -> PagerResult<()> {
        let position = self.rows[index].position;
        let mut table = self.store.load()?;
        let len = table.len();
        if table.remove(position).is_none() {
            warn!(
                "event=task_delete module=pager status=error position={position} \
                 error_code=stale_position"
            );
            return Err(PagerError::StalePosition { position, len });
        }
        self.store.save(&table)?;
        info!(
            "event=task_delete module=pager status=ok position={position} remaining={}",
            table.len()
        );
        Ok(())
    }
}

fn action_name(action: PagerAction) -> &'static str {
    match action {
        PagerAction::Edit => "edit",
        PagerAction::Delete => "delete",
        PagerAction::Next => "view next",
        PagerAction::Previous => "view previous",
        PagerAction::Back => "go back",
    }
}
