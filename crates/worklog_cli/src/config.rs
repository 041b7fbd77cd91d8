//! CLI configuration.
//!
//! Resolution order (highest first): command-line flags, `WORKLOG_*`
//! environment variables, compiled defaults.

use clap::Parser;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use worklog_core::{default_log_level, DEFAULT_FILE_NAME};

#[derive(Parser, Debug, Default)]
#[command(name = "worklog", version, about = "Log completed tasks and search them later")]
pub struct CliArgs {
    /// Path to the work log CSV file.
    #[arg(short, long, env = "WORKLOG_FILE")]
    pub file: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, env = "WORKLOG_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files (default: `<data dir>/worklog/logs`).
    #[arg(long, env = "WORKLOG_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Disable file logging.
    #[arg(long)]
    pub no_log: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    CurrentDir(std::io::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CurrentDir(err) => write!(f, "cannot resolve current directory: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CurrentDir(err) => Some(err),
        }
    }
}

/// Fully resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub log_level: String,
    /// `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Merges CLI/env values with defaults.
    ///
    /// # Errors
    /// - The current directory is needed to absolutize a relative log
    ///   directory but cannot be read.
    pub fn resolve(args: &CliArgs) -> Result<Self, ConfigError> {
        let data_file = args
            .file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME));
        let log_level = args
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());

        let log_dir = if args.no_log {
            None
        } else {
            match args.log_dir.as_deref() {
                Some(dir) => Some(absolutize(dir)?),
                None => default_log_dir(),
            }
        };

        Ok(Self {
            data_file,
            log_level,
            log_dir,
        })
    }
}

fn default_log_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("worklog").join("logs"))
}

// The logger only accepts absolute directories.
fn absolutize(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, CliArgs};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn defaults_use_work_log_csv_in_current_directory() {
        let config = AppConfig::resolve(&CliArgs::default()).unwrap();

        assert_eq!(config.data_file, PathBuf::from("work_log.csv"));
        assert_eq!(config.log_level, worklog_core::default_log_level());
    }

    #[test]
    fn flags_override_defaults() {
        let args = CliArgs::try_parse_from([
            "worklog",
            "--file",
            "/tmp/tasks.csv",
            "--log-level",
            "warn",
            "--log-dir",
            "/var/log/worklog",
        ])
        .unwrap();

        let config = AppConfig::resolve(&args).unwrap();

        assert_eq!(config.data_file, PathBuf::from("/tmp/tasks.csv"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/worklog")));
    }

    #[test]
    fn relative_log_dir_is_made_absolute() {
        let args = CliArgs {
            log_dir: Some(PathBuf::from("logs")),
            ..CliArgs::default()
        };

        let config = AppConfig::resolve(&args).unwrap();

        let log_dir = config.log_dir.unwrap();
        assert!(log_dir.is_absolute());
        assert!(log_dir.ends_with("logs"));
    }

    #[test]
    fn no_log_disables_logging() {
        let args = CliArgs::try_parse_from(["worklog", "--no-log"]).unwrap();

        assert_eq!(AppConfig::resolve(&args).unwrap().log_dir, None);
    }
}
