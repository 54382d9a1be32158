//! Tracing subscriber setup.
//!
//! `RUST_LOG` always wins; otherwise the verbosity level picks the filter.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter directive for a verbosity level (0 = warn, 3+ = trace).
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// Returns `false` if a subscriber was already installed, which happens when
/// several tests in one binary call this.
pub fn try_init_logging(verbosity: u8) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .try_init()
        .is_ok()
}

/// Install the global subscriber, ignoring an existing one.
pub fn init_logging(verbosity: u8) {
    if !try_init_logging(verbosity) {
        tracing::debug!("Tracing subscriber already installed");
    }
}
