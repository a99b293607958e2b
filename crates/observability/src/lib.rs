//! Logging setup shared by embedders and tests.

pub mod tracing;

/// Initialize process-wide logging. Idempotent.
pub fn init() {
    tracing::init();
}
