//! Diagnostic logging.
//!
//! Logs always go to stderr so they never interleave with the review display
//! on stdout. `RUST_LOG` takes precedence over `--log-level`:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=csv_review_core=trace` - only the loader and comment store

use crate::types::LogLevel;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber for the process.
///
/// Calling this more than once keeps the first subscriber.
pub fn init(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter);

    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}
