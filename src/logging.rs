//! Tracing setup for the command-line tool.
//!
//! Every run gets its own log file under the app's `logs/` directory. Console
//! output is optional and can be routed to stderr so `--json` output on stdout
//! stays machine-readable.

mod files;

use std::{path::PathBuf, sync::OnceLock};

use time::{UtcOffset, format_description::BorrowedFormatItem, macros::format_description};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, writer::BoxMakeWriter},
    prelude::*,
};

use crate::app_dirs::{self, AppDirError};

/// Log files kept in the logs directory, newest first.
pub const MAX_LOG_FILES: usize = 10;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("No suitable data directory available for logs")]
    NoDataDir,
    #[error("Failed to prepare log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read log directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to remove old log file {path}: {source}")]
    RemoveFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to format log filename time: {0}")]
    FormatTime(time::error::Format),
    #[error("Failed to create log file at {path}: {source}")]
    CreateLogFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(tracing::subscriber::SetGlobalDefaultError),
}

impl From<AppDirError> for LoggingError {
    fn from(error: AppDirError) -> Self {
        match error {
            AppDirError::NoBaseDir => Self::NoDataDir,
            AppDirError::CreateDir { path, source } => Self::CreateDir { path, source },
        }
    }
}

/// Where console log lines go.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Console {
    #[default]
    Stdout,
    Stderr,
    /// File only.
    Off,
}

/// How [`init`] wires the subscriber.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogSettings {
    /// Filter used when `RUST_LOG` is unset.
    pub default_filter: String,
    pub console: Console,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            default_filter: "info".to_string(),
            console: Console::Stdout,
        }
    }
}

impl LogSettings {
    /// Settings for a CLI run. Machine-readable output moves console logs to stderr.
    pub fn for_cli(verbose: bool, quiet: bool, machine_output: bool) -> Self {
        let default_filter = match (verbose, quiet) {
            (true, _) => "pausetrim=debug,info",
            (false, true) => "warn",
            (false, false) => "info",
        };
        let console = match (quiet, machine_output) {
            (true, _) => Console::Off,
            (false, true) => Console::Stderr,
            (false, false) => Console::Stdout,
        };
        Self {
            default_filter: default_filter.to_string(),
            console,
        }
    }
}

/// Install the global subscriber and return this run's log file.
///
/// Only the first successful call takes effect; later calls return `None`.
/// Errors leave the process without a subscriber, which the caller may
/// treat as non-fatal.
pub fn init(settings: &LogSettings) -> Result<Option<PathBuf>, LoggingError> {
    if LOG_GUARD.get().is_some() {
        return Ok(None);
    }

    let log_dir = app_dirs::logs_dir()?;
    let file_name = files::log_file_name(files::now_local_or_utc())?;
    let log_path = files::create_log_file(&log_dir, &file_name)?;
    files::prune_old_logs(&log_dir, MAX_LOG_FILES)?;

    let (file_writer, guard) = tracing_appender::non_blocking(rolling::never(&log_dir, &file_name));
    let timer = local_timer();
    let console_layer = console_writer(settings.console).map(|writer| {
        fmt::layer()
            .with_timer(timer.clone())
            .with_writer(writer)
    });
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_timer(timer)
        .with_writer(file_writer);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.default_filter));
    let subscriber = Registry::default()
        .with(filter)
        .with(console_layer)
        .with(file_layer);
    tracing::subscriber::set_global_default(subscriber).map_err(LoggingError::SetGlobal)?;
    let _ = LOG_GUARD.set(guard);

    tracing::debug!("Logging to {}", log_path.display());
    Ok(Some(log_path))
}

fn console_writer(console: Console) -> Option<BoxMakeWriter> {
    match console {
        Console::Stdout => Some(BoxMakeWriter::new(std::io::stdout)),
        Console::Stderr => Some(BoxMakeWriter::new(std::io::stderr)),
        Console::Off => None,
    }
}

fn local_timer() -> fmt::time::OffsetTime<&'static [BorrowedFormatItem<'static>]> {
    const DISPLAY_FORMAT: &[BorrowedFormatItem<'static>] =
        format_description!("[hour]:[minute]:[second].[subsecond digits:3]");
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    fmt::time::OffsetTime::new(offset, DISPLAY_FORMAT)
}
