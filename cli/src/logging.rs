//! Logging configuration with file-based output and size-based rotation.
//!
//! Writes logs to `~/.config/quill/quill.log` (or platform equivalent) with
//! 5 MB size-based rotation. Set `QUILL_DEBUG=1` to enable debug output
//! for quill crates.

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEBUG_DIRECTIVES: &str = "info,quill_core=debug,quill_cli=debug";

/// Initialize logging with dual-output (file + stdout).
///
/// Returns a `WorkerGuard` that must be held for the process lifetime so
/// buffered lines are flushed on exit. Falls back to stdout-only logging
/// (returning `None`) when the log directory cannot be used.
pub fn init() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let debug_logging = debug_enabled(std::env::var("QUILL_DEBUG").ok().as_deref());

    let log_dir = match dirs::config_dir() {
        Some(config) => config.join("quill"),
        None => {
            init_stdout_only(debug_logging);
            return None;
        }
    };

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        // Can't use tracing yet since subscriber not initialized
        eprintln!(
            "Failed to create log directory {:?}: {}, using stdout only",
            log_dir, e
        );
        init_stdout_only(debug_logging);
        return None;
    }

    let log_path = log_dir.join("quill.log");
    let file_appender = match BasicRollingFileAppender::new(
        &log_path,
        RollingConditionBasic::new().max_size(5 * 1024 * 1024),
        1, // quill.log and quill.log.1
    ) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Failed to create log file at {:?}: {}", log_path, e);
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

    tracing::info!(log_file = ?log_path, debug_logging, "Quill logging initialized");

    Some(guard)
}

fn init_stdout_only(debug_logging: bool) {
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(filter(debug_logging))
        .init();

    tracing::info!(debug_logging, "Quill logging initialized (stdout only)");
}

/// `RUST_LOG` wins when set; otherwise info, or debug for quill crates.
fn filter(debug_logging: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if debug_logging { DEBUG_DIRECTIVES } else { "info" })
    })
}

fn debug_enabled(value: Option<&str>) -> bool {
    matches!(value, Some(v) if !v.is_empty() && v != "0")
}
