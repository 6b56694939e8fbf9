//! Tracing setup: env-filtered subscriber with optional JSON output.

pub mod spans;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lethe_core::config::ObservabilityConfig;

/// Environment variable consulted before the configured log level.
pub const LOG_ENV: &str = "LETHE_LOG";

/// Install the global subscriber.
///
/// `LETHE_LOG` wins over `config.log_level` when set. Returns false when a
/// global subscriber was already installed, so calling this twice is harmless.
pub fn init_tracing(config: &ObservabilityConfig) -> bool {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    install(filter, config.json)
}

/// Install the global subscriber with an explicit filter string (tests, embedding).
pub fn init_tracing_with_filter(filter: &str, json: bool) -> bool {
    install(EnvFilter::new(filter), json)
}

fn install(filter: EnvFilter, json: bool) -> bool {
    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(true))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
    };
    result.is_ok()
}
