//! `worklog` entry point.
//!
//! # Responsibility
//! - Resolve configuration and start file logging.
//! - Run the interactive shell over stdin/stdout against the CSV store.

mod config;
mod shell;

use clap::Parser;
use config::{AppConfig, CliArgs};
use log::{error, info};
use shell::console::Console;
use shell::Shell;
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use worklog_core::{core_version, init_logging, CsvRecordStore, WorkLogService};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let config = match AppConfig::resolve(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("worklog: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_dir) = config.log_dir.as_deref() {
        // Logging is optional; the shell still runs without it.
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("worklog: file logging disabled: {err}");
        }
    }
    info!(
        "event=cli_start module=cli status=ok version={} data_file={}",
        core_version(),
        config.data_file.display()
    );

    let clear_screen = io::stdout().is_terminal();
    let console = Console::new(io::stdin().lock(), io::stdout().lock(), clear_screen);
    let service = WorkLogService::new(CsvRecordStore::new(&config.data_file));
    let mut shell = Shell::new(console, service);

    match shell.run() {
        Ok(()) => {
            info!("event=cli_exit module=cli status=ok");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=cli_exit module=cli status=error error={err}");
            eprintln!("worklog: {err}");
            ExitCode::FAILURE
        }
    }
}
