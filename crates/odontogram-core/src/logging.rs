//! Logging bootstrap for host applications and tests.
//!
//! The engine only emits `tracing` events; installing a subscriber is up to
//! the host. `RUST_LOG` controls the filter (default: `info`), e.g.
//! `RUST_LOG=odontogram_core=debug`.

use tracing_subscriber::{fmt, EnvFilter};

/// Install a global fmt subscriber. Call once at startup.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// Install a debug-level subscriber that writes through the test harness.
/// Safe to call from every test.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_is_repeatable() {
        init_test();
        init_test();
        tracing::debug!("subscriber installed");
    }
}
