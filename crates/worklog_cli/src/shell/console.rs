//! Line-oriented terminal I/O for the shell.
//!
//! # Invariants
//! - End of input surfaces as `ShellError::InputClosed`, never as an empty
//!   answer.
//! - Trailing `\r`/`\n` are stripped; other whitespace is preserved.

use super::{ShellError, ShellResult};
use std::io::{BufRead, Write};
use worklog_core::ValidationError;

const CLEAR_SEQUENCE: &str = "\x1B[2J\x1B[1;1H";

pub struct Console<R, W> {
    input: R,
    output: W,
    clear_screen: bool,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// `clear_screen` should only be set when output is an interactive
    /// terminal.
    pub fn new(input: R, output: W, clear_screen: bool) -> Self {
        Self {
            input,
            output,
            clear_screen,
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    pub fn clear(&mut self) -> ShellResult<()> {
        if self.clear_screen {
            write!(self.output, "{CLEAR_SEQUENCE}")?;
        }
        Ok(())
    }

    pub fn line(&mut self, text: &str) -> ShellResult<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    pub fn read_line(&mut self) -> ShellResult<String> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ShellError::InputClosed);
        }
        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(line)
    }

    /// Writes `question`, then reads the answer after a `> ` marker.
    pub fn ask(&mut self, question: &str) -> ShellResult<String> {
        write!(self.output, "{question}\n> ")?;
        self.read_line()
    }

    /// Re-asks `question` on a cleared screen until `parse` accepts the
    /// answer, showing the last rejection above the question.
    pub fn ask_until<T>(
        &mut self,
        question: &str,
        mut parse: impl FnMut(&str) -> Result<T, ValidationError>,
    ) -> ShellResult<T> {
        let mut rejection: Option<ValidationError> = None;
        loop {
            self.clear()?;
            if let Some(err) = rejection.take() {
                writeln!(self.output, "{}. Try again.\n", capitalize(&err.to_string()))?;
            }
            let answer = self.ask(question)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(err) => rejection = Some(err),
            }
        }
    }

    /// Shows `message` and waits for Enter.
    pub fn pause(&mut self, message: &str) -> ShellResult<()> {
        write!(self.output, "{message}")?;
        self.read_line().map(|_| ())
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{capitalize, Console};
    use crate::shell::ShellError;
    use std::io::Cursor;
    use worklog_core::coerce_duration;

    #[test]
    fn read_line_strips_line_endings_only() {
        let mut console = Console::new(Cursor::new("  padded \r\n"), Vec::new(), false);
        assert_eq!(console.read_line().unwrap(), "  padded ");
    }

    #[test]
    fn read_line_reports_closed_input() {
        let mut console = Console::new(Cursor::new(""), Vec::new(), false);
        assert!(matches!(console.read_line(), Err(ShellError::InputClosed)));
    }

    #[test]
    fn ask_until_reprompts_with_reason() {
        let mut console = Console::new(Cursor::new("ten\n10\n"), Vec::new(), false);

        let minutes = console.ask_until("Minutes?", coerce_duration).unwrap();

        assert_eq!(minutes, 10);
        let output = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(output.matches("Minutes?").count(), 2);
        assert!(output.contains("Duration `ten` is not a whole number of minutes. Try again."));
    }

    #[test]
    fn clear_is_skipped_for_non_terminals() {
        let mut console = Console::new(Cursor::new(""), Vec::new(), false);
        console.clear().unwrap();
        assert!(console.into_output().is_empty());
    }

    #[test]
    fn capitalize_handles_empty_text() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("task"), "Task");
    }
}
