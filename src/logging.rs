//! Logging configuration using tracing, to a file or stderr.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize tracing.
///
/// With a `log_path`, events go to that file without ANSI colors; otherwise
/// they go to stderr. Returns a guard that must be held for the duration of
/// the program to ensure logs are flushed.
///
/// In debug builds, span enter/exit events are logged for detailed tracing.
/// In release builds, only explicit log events are recorded for performance.
pub fn init_logging(log_path: Option<&Path>, level: Option<&str>) -> WorkerGuard {
    let level = level.unwrap_or("warn");

    let (non_blocking, guard, ansi) = match log_path {
        Some(log_path) => {
            let parent = log_path.parent().unwrap_or(Path::new("."));
            let filename = log_path
                .file_name()
                .unwrap_or_else(|| std::ffi::OsStr::new("huepick.log"));
            let file_appender = tracing_appender::rolling::never(parent, filename);
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            (writer, guard, false)
        }
        None => {
            let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
            (writer, guard, true)
        }
    };

    let filter = EnvFilter::try_new(format!("huepick={level}"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(ansi)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false);

    // Only add span events in debug builds (significant overhead in release)
    #[cfg(debug_assertions)]
    let layer = {
        use tracing_subscriber::fmt::format::FmtSpan;
        layer.with_span_events(FmtSpan::ENTER | FmtSpan::CLOSE)
    };

    tracing_subscriber::registry().with(filter).with(layer).init();

    guard
}
