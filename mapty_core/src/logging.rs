//! Logging setup for hosts embedding the controller.
//!
//! The controller only emits `tracing` events; installing a subscriber is the
//! host's call. Hosts that are re-initialized within one process (page
//! reloads in a dev server, test binaries) should use [`try_init`].

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter: this crate at INFO, everything else at WARN
const DEFAULT_DIRECTIVES: &str = "warn,mapty_core=info";

/// Install the compact subscriber, panicking if one is already set
pub fn init() {
    tracing_subscriber::registry()
        .with(filter(DEFAULT_DIRECTIVES))
        .with(fmt::layer().compact().with_target(false))
        .init();
}

/// Install the compact subscriber unless one is already set
///
/// `directives` is used when RUST_LOG is unset or unparsable, e.g.
/// `"mapty_core=debug"`. Returns `false` if another subscriber won.
pub fn try_init(directives: &str) -> bool {
    tracing_subscriber::registry()
        .with(filter(directives))
        .with(fmt::layer().compact().with_target(false))
        .try_init()
        .is_ok()
}

fn filter(directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
}

/// Route controller logs to the test harness output
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("mapty_core=debug"))
        .try_init();
}
