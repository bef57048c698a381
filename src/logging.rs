//! Diagnostic logging to a file
//!
//! The terminal belongs to the dashboard, so log lines go to
//! `weatherdash.log` in the per-user data directory. The filter comes from
//! `WEATHERDASH_LOG` using the usual `EnvFilter` syntax.

use directories::ProjectDirs;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "WEATHERDASH_LOG";

/// Filter used when `WEATHERDASH_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "info,weatherdash=debug";

pub const LOG_FILE_NAME: &str = "weatherdash.log";

/// Default log file location, `None` without a home directory
pub fn default_log_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "weatherdash")?;
    Some(dirs.data_dir().join(LOG_FILE_NAME))
}

/// Parses a filter directive, falling back to [`DEFAULT_FILTER`]
pub fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Opens the log file for appending, creating parent directories
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Installs the global subscriber writing to `path`
///
/// Returns the path actually used. When the file cannot be opened logging
/// stays disabled instead of writing over the screen.
pub fn init_logging(path: Option<PathBuf>) -> Option<PathBuf> {
    let path = path.or_else(default_log_path)?;
    let file = open_log_file(&path).ok()?;
    let directives = std::env::var(LOG_ENV).ok();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file)),
        )
        .with(filter_from(directives.as_deref()))
        .try_init()
        .ok()?;

    Some(path)
}
