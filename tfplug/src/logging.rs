//! Logging setup for provider binaries
//!
//! Logs go to stderr. Terraform owns stdout for the plugin handshake.
//! Filtering follows `RUST_LOG`, e.g. `RUST_LOG=devgraph=debug`.

use crate::error::{Result, TfplugError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_LEVEL: &str = "info";

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber with the given fallback level
///
/// Fails if a global subscriber is already set.
pub fn init_logging_with_default(default_level: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(filter(default_level))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .try_init()
        .map_err(|e| TfplugError::LoggingInit(e.to_string()))
}

pub fn init_logging() -> Result<()> {
    init_logging_with_default(DEFAULT_LOG_LEVEL)
}

/// Like [`init_logging`] but returns false instead of an error when a
/// subscriber is already installed. Safe to call from every test.
pub fn try_init_logging() -> bool {
    init_logging().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global subscriber can only be set once per process, so these
    // only check that repeated initialisation is harmless.
    #[test]
    fn test_second_init_is_reported_not_panicking() {
        let _ = try_init_logging();
        assert!(!try_init_logging());
        assert!(matches!(
            init_logging_with_default("debug"),
            Err(TfplugError::LoggingInit(_))
        ));
        tracing::info!("logging initialised");
    }
}
