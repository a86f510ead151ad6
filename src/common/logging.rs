//! Logging and tracing configuration
//!
//! The harness logs progress to stderr; a best-effort file layer keeps a
//! durable record of each run at `<data dir>/logs/harness.log`.

use std::path::PathBuf;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use super::paths;

/// Initialize tracing for the harness
///
/// Log level is controlled by `RUST_LOG`; the default is INFO for this
/// crate (DEBUG with `verbose`) and WARN for dependencies. Returns the
/// log file path if file logging could be set up.
pub fn init(verbose: bool) -> Option<PathBuf> {
    let default_filter = if verbose {
        "chaos_e2e=debug,warn"
    } else {
        "chaos_e2e=info,warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    if let Some(log_dir) = paths::log_dir() {
        if std::fs::create_dir_all(&log_dir).is_ok() {
            let log_file = log_dir.join("harness.log");
            if let Ok(file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_file)
            {
                let file_layer = fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(true);

                tracing_subscriber::registry()
                    .with(filter)
                    .with(stderr_layer)
                    .with(file_layer)
                    .init();

                return Some(log_file);
            }
        }
    }

    // Fallback: stderr only
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();

    None
}
