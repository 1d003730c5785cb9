//! Tracing and logging (shared setup).

pub use self::tracing::LogFormat;

/// Initialize process-wide tracing/logging.
///
/// Format comes from `LOG_FORMAT` (`json` default, `pretty`), filtering
/// from `RUST_LOG`. Safe to call multiple times; later calls are no-ops.
pub fn init() {
    let format = std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_default();
    tracing::init(format);
}

/// Tracing configuration (filters, layers).
pub mod tracing;
