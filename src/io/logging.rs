//! Structured logging setup

use crate::io::configuration::LOG_FILTER_ENV;
use crate::io::error::{Result, computation_error};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directive for a `-v` count
pub const fn filter_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "tilecollapse=warn",
        1 => "tilecollapse=info",
        2 => "tilecollapse=debug",
        _ => "tilecollapse=trace",
    }
}

/// Install the global subscriber
///
/// `TILECOLLAPSE_LOG` takes precedence over `verbosity` when set.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init_logging(verbosity: u8) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbosity)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| computation_error("logging setup", &e))
}
