//! Process-wide logging setup shared by the binaries.

/// Initialize process-wide tracing output.
///
/// Safe to call multiple times; later calls are no-ops.
pub fn init() {
    tracing::init();
}

/// Subscriber configuration (filters, formatting).
pub mod tracing;
