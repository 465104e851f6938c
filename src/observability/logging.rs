use crate::common::constants::{DEFAULT_LOG_DIR, LOG_DIR_VAR, LOG_FILE_PREFIX};
use std::fs;
use std::path::Path;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the logging system with both console and file output.
///
/// Console output is human readable; the file under `NCCPA_LOG_DIR` (default
/// `logs/`) is JSON and rotates daily. When that directory cannot be used the
/// checker logs to the console only. The returned guard flushes the file writer
/// on drop, so keep it alive for the life of the process.
pub fn init_logging() -> Option<WorkerGuard> {
    let log_dir = std::env::var(LOG_DIR_VAR).unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());

    let (file_layer, guard, file_error) = match open_log_file(Path::new(&log_dir)) {
        Ok(appender) => {
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().json().with_writer(non_blocking_writer)), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stdout);

    // Respect RUST_LOG if set
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("nccpa_checker=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    if let Some(e) = file_error {
        warn!("File logging disabled: {}", e);
    }

    guard
}

/// Daily-rotated log file in `dir`, creating the directory if needed.
pub fn open_log_file(dir: &Path) -> Result<RollingFileAppender, String> {
    fs::create_dir_all(dir)
        .map_err(|e| format!("cannot create log directory '{}': {}", dir.display(), e))?;
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(dir)
        .map_err(|e| format!("cannot open log file in '{}': {}", dir.display(), e))
}
