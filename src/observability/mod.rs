//! Structured logging.
//!
//! Logs go to stderr: stdout carries the MCP message stream when serving
//! over stdio.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "mergelens=info";

/// Initialize structured logging with `RUST_LOG` environment variable support.
///
/// Defaults to `mergelens=info`; `verbose` raises it to `mergelens=debug`.
/// Subsequent calls are silently ignored.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose {
        "mergelens=debug"
    } else {
        DEFAULT_LOG_FILTER
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // try_init so double-init in tests doesn't panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}
