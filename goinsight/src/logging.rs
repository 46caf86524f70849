//! Diagnostics for operators.
//!
//! Step notices and warnings go to stderr through `tracing`; final operation
//! summaries are printed on stdout by [`crate::dispatch`].

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `info` so step notices are visible.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=goinsight=debug goinsight get-model
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
