//! Tracing subscriber initialization.
//!
//! One JSON object per event on stdout, filtered through `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Directives used when `RUST_LOG` is unset or unparsable.
///
/// sqlx logs every statement at `info`, which drowns out request logs.
pub const DEFAULT_DIRECTIVES: &str = "info,sqlx=warn";

/// Build the filter from `RUST_LOG`, falling back to [`DEFAULT_DIRECTIVES`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
