//! Logging configuration with file-based output and size-based rotation.
//!
//! Writes logs to `edgeline.log` next to the config file (platform config
//! directory) with 10 MB size-based rotation. Set `DEBUG_LOGGING=1` to
//! enable debug output for edgeline crates.

use std::path::PathBuf;

use edgeline_core::{AppConfig, AppConfigExt};
use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const LOG_FILE_NAME: &str = "edgeline.log";
const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// Initialize logging with dual output (file + stdout).
///
/// Returns a `WorkerGuard` that MUST be held for the application lifetime
/// so buffered log lines are flushed on shutdown. Falls back to stdout-only
/// logging and returns `None` if the log file cannot be opened.
pub fn init() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let Some(log_dir) = log_dir() else {
        init_stdout_only(debug_logging);
        return None;
    };

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        // Can't use tracing yet since subscriber not initialized
        eprintln!("Failed to create log directory {log_dir:?}: {e}, using stdout only");
        init_stdout_only(debug_logging);
        return None;
    }

    // Keep only the latest rotated file (edgeline.log and edgeline.log.1)
    let log_path = log_dir.join(LOG_FILE_NAME);
    let file_appender = match BasicRollingFileAppender::new(
        &log_path,
        RollingConditionBasic::new().max_size(MAX_LOG_SIZE),
        1,
    ) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Failed to create log file at {log_path:?}: {e}");
            init_stdout_only(debug_logging);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .with(filter(debug_logging))
        .init();

    tracing::info!(log_file = ?log_path, debug_logging, "Edgeline logging initialized");

    Some(guard)
}

/// Directory holding the confy config file
fn log_dir() -> Option<PathBuf> {
    AppConfig::config_path()
        .ok()
        .and_then(|path| path.parent().map(PathBuf::from))
}

fn filter(debug_logging: bool) -> EnvFilter {
    if debug_logging {
        EnvFilter::new("info,edgeline_core=debug,edgeline_overlay=debug,edgeline_cli=debug")
    } else {
        EnvFilter::new("info")
    }
}

/// Fallback: stdout-only logging when file logging fails.
fn init_stdout_only(debug_logging: bool) {
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(filter(debug_logging))
        .init();

    tracing::info!(debug_logging, "Edgeline logging initialized (stdout only)");
}
