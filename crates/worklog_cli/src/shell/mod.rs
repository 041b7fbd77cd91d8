//! Interactive menu shell.
//!
//! # Responsibility
//! - Render menus and task screens.
//! - Collect and coerce user input, re-prompting on validation failures.
//! - Dispatch to the core service; the core never prints.
//!
//! # Invariants
//! - Validation failures re-ask only the offending question.
//! - Storage failures abort the current operation and return to the main
//!   menu; they do not end the session.
//! - Closed input ends the session cleanly.

pub mod console;

use console::Console;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{BufRead, Write};
use worklog_core::{
    coerce_date, coerce_duration, coerce_title, format_date, PagerAction, PagerError,
    PagerNotice, PagerState, RecordStore, SearchError, SearchMode, SearchQuery, StoreError,
    TableRow, Task, TaskField, WorkLogService,
};

pub type ShellResult<T> = Result<T, ShellError>;

#[derive(Debug)]
pub enum ShellError {
    /// Input reached end-of-file.
    InputClosed,
    Io(std::io::Error),
    Store(StoreError),
    Search(SearchError),
    Pager(PagerError),
}

impl Display for ShellError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputClosed => write!(f, "input closed"),
            Self::Io(err) => write!(f, "terminal I/O failed: {err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Search(err) => write!(f, "{err}"),
            Self::Pager(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ShellError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InputClosed => None,
            Self::Io(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Search(err) => Some(err),
            Self::Pager(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ShellError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<StoreError> for ShellError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<SearchError> for ShellError {
    fn from(value: SearchError) -> Self {
        Self::Search(value)
    }
}

impl From<PagerError> for ShellError {
    fn from(value: PagerError) -> Self {
        Self::Pager(value)
    }
}

const RETURN_PROMPT: &str = "Press Enter to return to the main menu.";

pub struct Shell<R, W, S: RecordStore> {
    console: Console<R, W>,
    service: WorkLogService<S>,
}

impl<R: BufRead, W: Write, S: RecordStore> Shell<R, W, S> {
    pub fn new(console: Console<R, W>, service: WorkLogService<S>) -> Self {
        Self { console, service }
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (Console<R, W>, WorkLogService<S>) {
        (self.console, self.service)
    }

    /// Runs the main menu until the user quits or input closes.
    ///
    /// # Errors
    /// - Only terminal I/O failures end the loop with an error.
    pub fn run(&mut self) -> ShellResult<()> {
        let mut message: Option<&str> = None;
        loop {
            let choice = match self.main_menu(message.take()) {
                Ok(choice) => choice,
                Err(ShellError::InputClosed) => return Ok(()),
                Err(err) => return Err(err),
            };

            let outcome = match choice.trim().to_ascii_lowercase().as_str() {
                "a" => self.add_task(),
                "s" if self.service.has_log() => self.search_task(),
                "q" => return self.quit(),
                _ => {
                    message = Some("Selection not recognized. Try again.");
                    continue;
                }
            };

            match outcome {
                Ok(()) => {}
                Err(ShellError::InputClosed) => return Ok(()),
                Err(ShellError::Io(err)) => return Err(ShellError::Io(err)),
                Err(err) => {
                    error!("event=operation_failed module=shell status=error error={err}");
                    self.report_failure(&err)?;
                }
            }
        }
    }

    fn main_menu(&mut self, message: Option<&str>) -> ShellResult<String> {
        self.console.clear()?;
        self.console.line("WORK LOG\n========\n")?;
        self.console
            .line(&format!("{}\n", message.unwrap_or("What would you like to do?")))?;
        self.console.line("(A)dd a task")?;
        if self.service.has_log() {
            self.console.line("(S)earch for a task")?;
        }
        self.console.line("(Q)uit")?;
        self.console.ask("")
    }

    fn add_task(&mut self) -> ShellResult<()> {
        let date = self
            .console
            .ask_until("When was this task completed? (DD/MM/YYYY)", coerce_date)?;
        let title = self
            .console
            .ask_until("Enter a short description of the task.", coerce_title)?;
        let duration = self.console.ask_until(
            "Enter the duration of the task in minutes.",
            coerce_duration,
        )?;
        self.console.clear()?;
        let notes = self.console.ask("Enter any additional notes (optional):")?;

        let task = Task::new(date, title, duration, notes);
        let position = self.service.add(task.clone())?;
        info!("event=shell_add module=shell status=ok position={position}");

        self.console.clear()?;
        self.console.line("Task entry has been added!\n")?;
        render_fields(&mut self.console, &task)?;
        self.console.line("")?;
        self.console.pause(RETURN_PROMPT)
    }

    fn search_task(&mut self) -> ShellResult<()> {
        let mut message: Option<&str> = None;
        let rows = loop {
            let Some(mode) = self.search_menu(&mut message)? else {
                return Ok(());
            };
            let Some(query) = self.read_query(mode)? else {
                message = Some("No results were found using your criteria\nPlease try again.");
                continue;
            };
            let rows = self.service.search(&query)?;
            if rows.is_empty() {
                message = Some("No results were found using your criteria\nPlease try again.");
                continue;
            }
            break rows;
        };
        self.page(rows)
    }

    /// Returns `None` when the user goes back to the main menu.
    fn search_menu(&mut self, message: &mut Option<&str>) -> ShellResult<Option<SearchMode>> {
        loop {
            self.console.clear()?;
            self.console.line("What criteria would you like to use for searching?\n")?;
            self.console.line("Search by (D)ate")?;
            self.console.line("Search by Dura(t)ion")?;
            self.console.line("Search by (K)eyword")?;
            self.console.line("Search by Regex (p)attern")?;
            self.console.line("Search by Date (R)ange")?;
            self.console.line("Or go (B)ack.")?;
            let prompt = format!("\n{}\n", message.take().unwrap_or("Enter criteria below:"));
            let input = self.console.ask(&prompt)?;

            if input.trim().eq_ignore_ascii_case("b") {
                return Ok(None);
            }
            match SearchMode::from_menu_input(&input) {
                Some(mode) => return Ok(Some(mode)),
                None => *message = Some("Selection not recognized. Try again."),
            }
        }
    }

    /// Returns `None` when there is nothing to choose from.
    fn read_query(&mut self, mode: SearchMode) -> ShellResult<Option<SearchQuery>> {
        let query = match mode {
            SearchMode::ExactDate => {
                let dates = self.service.distinct_dates()?;
                if dates.is_empty() {
                    return Ok(None);
                }
                let mut question = String::from("Which date would you like to search on?\n");
                for (index, date) in dates.iter().enumerate() {
                    question.push_str(&format!("\n({}) {}", index + 1, format_date(*date)));
                }
                self.console
                    .ask_until(&question, |raw| SearchQuery::exact_date(&dates, raw))?
            }
            SearchMode::ExactDuration => self.console.ask_until(
                "What duration (in minutes) would you like to search by?",
                SearchQuery::exact_duration,
            )?,
            SearchMode::Keyword => {
                self.console.clear()?;
                let keyword = self
                    .console
                    .ask("What keyword would you like to search by?")?;
                SearchQuery::keyword(&keyword)
            }
            SearchMode::Pattern => self.console.ask_until(
                "What regex pattern would you like to search by?",
                SearchQuery::pattern,
            )?,
            SearchMode::DateRange => {
                let from = self.console.ask_until(
                    "What is the date range you would like to search by?\nFROM (DD/MM/YYYY):",
                    coerce_date,
                )?;
                let to = self.console.ask_until("TO (DD/MM/YYYY):", coerce_date)?;
                SearchQuery::between(from, to)
            }
        };
        Ok(Some(query))
    }

    fn page(&mut self, rows: Vec<TableRow>) -> ShellResult<()> {
        let mut pager = self.service.pager(rows);
        loop {
            match pager.state() {
                PagerState::Viewing(_) => {
                    let Some(row) = pager.current().cloned() else {
                        return Ok(());
                    };
                    let message = match pager.notice() {
                        Some(PagerNotice::ChoiceNotRecognized) => {
                            "Choice not recognized. Try again.".to_string()
                        }
                        Some(PagerNotice::TaskUpdated(field)) => {
                            format!("Task {field} has been updated.")
                        }
                        None => "What would you like to do?".to_string(),
                    };

                    self.console.clear()?;
                    self.console.line("TASK\n====\n")?;
                    self.console.line(&format!("Task #{}", row.position))?;
                    render_fields(&mut self.console, &row.task)?;
                    self.console.line(&format!("\n{message}\n"))?;
                    self.console.line(&action_menu(&pager.available_actions()))?;
                    let input = self.console.ask("Or go (B)ack.")?;
                    pager.handle_input(&input)?;
                }
                PagerState::Editing(_) => match edit_field_menu(&mut self.console)? {
                    Some(field) => {
                        let raw = self
                            .console
                            .ask_until(field_question(field), |raw| {
                                field.coerce(raw).map(|_| raw.to_string())
                            })?;
                        pager.edit(field, &raw)?;
                    }
                    None => {
                        pager.cancel_edit()?;
                    }
                },
                PagerState::Deleted => {
                    self.console.clear()?;
                    self.console.pause(
                        "Task has been deleted. Press Enter to return to the main menu.",
                    )?;
                    pager.acknowledge()?;
                }
                PagerState::Done => return Ok(()),
            }
        }
    }

    fn report_failure(&mut self, err: &ShellError) -> ShellResult<()> {
        self.console.clear()?;
        self.console.line(&format!("Something went wrong: {err}\n"))?;
        self.console.pause(RETURN_PROMPT)
    }

    fn quit(&mut self) -> ShellResult<()> {
        self.console.clear()?;
        self.console.line("Thanks for using the work log!\n")
    }
}

/// Returns `None` when the user backs out of editing.
fn edit_field_menu<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
) -> ShellResult<Option<TaskField>> {
    let mut message = "What do you want to update?";
    loop {
        console.clear()?;
        console.line(&format!("{message}\n"))?;
        console.line("(D)ate")?;
        console.line("(T)itle")?;
        console.line("D(u)ration")?;
        console.line("(N)otes\n")?;
        let input = console.ask("Or go (B)ack.")?;
        if input.trim().eq_ignore_ascii_case("b") {
            return Ok(None);
        }
        match TaskField::from_menu_input(&input) {
            Some(field) => return Ok(Some(field)),
            None => message = "Choice not recognized. Try again.",
        }
    }
}

fn render_fields<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    task: &Task,
) -> ShellResult<()> {
    console.line(&format!("Date: {}", format_date(task.date)))?;
    console.line(&format!("Title: {}", task.title))?;
    console.line(&format!("Duration: {}", task.duration))?;
    console.line(&format!("Notes: {}", task.notes))
}

fn action_menu(actions: &[PagerAction]) -> String {
    actions
        .iter()
        .filter_map(|action| match action {
            PagerAction::Edit => Some("(E)dit,"),
            PagerAction::Delete => Some("(D)elete,"),
            PagerAction::Next => Some("view (N)ext,"),
            PagerAction::Previous => Some("view (P)revious,"),
            PagerAction::Back => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn field_question(field: TaskField) -> &'static str {
    match field {
        TaskField::Date => "When was this task completed? (DD/MM/YYYY)",
        TaskField::Title => "Enter a short description of the task.",
        TaskField::Duration => "Enter the duration of the task in minutes.",
        TaskField::Notes => "Enter any additional notes (optional):",
    }
}
