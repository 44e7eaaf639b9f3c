//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber reading its filter from
/// `DEBBOX_LOG` (default `info`). Safe to call more than once; later calls
/// are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_env("DEBBOX_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
