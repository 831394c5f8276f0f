//! Tracing subscriber setup for embedders that don't bring their own.

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Installs a global fmt subscriber and routes `log` records into it.
///
/// `RUST_LOG` wins when set; otherwise `info` globally and `level` for this
/// crate. Calling twice is harmless: the second install is ignored.
pub fn init_tracing(level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("info,threadcraft={}", level)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Dependencies (and this crate's ingest module) still emit through `log`.
    let _ = tracing_log::LogTracer::init();

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(env_filter)
        .try_init();
}
