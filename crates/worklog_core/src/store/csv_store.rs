//! CSV file record store.
//!
//! # Responsibility
//! - Persist the work log as a header-prefixed CSV file.
//! - Replace the file atomically on every save.
//!
//! # Invariants
//! - Saves write a sibling temp file and rename it over the target, so a
//!   failed save leaves the previous file untouched.
//! - An empty or whitespace-only file is treated the same as a missing one.
//! - Rows with more fields than the header are corrupt, never truncated.
//! - Saves keep the permissions of the file they replace.
//! - Header must be `date,title,duration,notes` (`notes` column optional).

use super::{RecordStore, StoreError, StoreResult};
use crate::model::table::Table;
use crate::model::task::{Task, FIELD_NAMES};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use log::{error, info};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Instant;
use tempfile::NamedTempFile;

/// Default file name used when no path is configured.
pub const DEFAULT_FILE_NAME: &str = "work_log.csv";

/// File-backed store for the work log table.
#[derive(Debug, Clone)]
pub struct CsvRecordStore {
    path: PathBuf,
}

impl CsvRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Raw file contents, or `None` when the file is missing or holds only
    /// whitespace.
    fn read_contents(&self) -> StoreResult<Option<Vec<u8>>> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(None),
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn read_table(&self) -> StoreResult<Table> {
        let Some(contents) = self.read_contents()? else {
            return Ok(Table::new());
        };

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(contents.as_slice());
        let headers = reader.headers()?.clone();
        validate_header(&headers)?;

        let mut table = Table::new();
        for result in reader.records() {
            let record = result?;
            let line = record.position().map_or(0, |position| position.line());
            if record.len() > headers.len() {
                return Err(StoreError::InvalidData {
                    line,
                    message: format!(
                        "expected at most {} fields, found {}",
                        headers.len(),
                        record.len()
                    ),
                });
            }
            let task: Task = record
                .deserialize(Some(&headers))
                .map_err(|err| StoreError::InvalidData {
                    line,
                    message: err.to_string(),
                })?;
            if task.title.trim().is_empty() {
                return Err(StoreError::InvalidData {
                    line,
                    message: "title is empty".to_string(),
                });
            }
            table.push(task);
        }

        Ok(table)
    }

    fn write_table(&self, table: &Table) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|err| self.io_error(err))?;

        let mut temp = NamedTempFile::new_in(&dir).map_err(|err| self.io_error(err))?;
        {
            let mut writer = WriterBuilder::new()
                .has_headers(false)
                .from_writer(temp.as_file_mut());
            writer.write_record(FIELD_NAMES)?;
            for task in table.tasks() {
                writer.serialize(task)?;
            }
            writer.flush().map_err(|err| self.io_error(err))?;
        }
        // Temp files are created owner-only; keep the existing file's mode.
        match std::fs::metadata(&self.path) {
            Ok(metadata) => temp
                .as_file()
                .set_permissions(metadata.permissions())
                .map_err(|err| self.io_error(err))?,
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(self.io_error(err)),
        }
        temp.as_file().sync_all().map_err(|err| self.io_error(err))?;

        temp.persist(&self.path).map_err(|err| self.io_error(err.error))?;
        Ok(())
    }
}

impl Default for CsvRecordStore {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_NAME)
    }
}

impl RecordStore for CsvRecordStore {
    fn load(&self) -> StoreResult<Table> {
        let started_at = Instant::now();
        match self.read_table() {
            Ok(table) => {
                info!(
                    "event=store_load module=store status=ok rows={} duration_ms={}",
                    table.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(table)
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn save(&self, table: &Table) -> StoreResult<()> {
        let started_at = Instant::now();
        match self.write_table(table) {
            Ok(()) => {
                info!(
                    "event=store_save module=store status=ok rows={} duration_ms={}",
                    table.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn ensure_initialized(&self) -> StoreResult<()> {
        if self.read_contents()?.is_some() {
            return Ok(());
        }
        info!("event=store_init module=store status=start");
        self.save(&Table::new())
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }
}

fn validate_header(headers: &StringRecord) -> StoreResult<()> {
    let found = headers.iter().collect::<Vec<_>>();
    let required = &FIELD_NAMES[..3];
    if found == FIELD_NAMES || found == required {
        return Ok(());
    }
    Err(StoreError::InvalidHeader {
        found: found.into_iter().map(str::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::validate_header;
    use csv::StringRecord;

    #[test]
    fn header_without_notes_column_is_accepted() {
        let headers = StringRecord::from(vec!["date", "title", "duration"]);
        assert!(validate_header(&headers).is_ok());
    }

    #[test]
    fn header_with_reordered_columns_is_rejected() {
        let headers = StringRecord::from(vec!["title", "date", "duration", "notes"]);
        assert!(validate_header(&headers).is_err());
    }
}
