//! Global `tracing` subscriber setup.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::TracingError;

/// Log level for a `-v` count: 0 warn, 1 info, 2 debug, 3+ trace.
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Filter from `RUST_LOG`, or the verbosity level when it is unset.
///
/// # Errors
///
/// Returns [`TracingError::InvalidFilter`] if `RUST_LOG` is set but malformed.
pub fn env_filter(verbosity: u8) -> Result<EnvFilter, TracingError> {
    EnvFilter::builder()
        .with_default_directive(level_for_verbosity(verbosity).into())
        .from_env()
        .map_err(|e| TracingError::InvalidFilter(e.to_string()))
}

/// Install the global formatting subscriber.
///
/// # Errors
///
/// Returns [`TracingError::InvalidFilter`] for a malformed `RUST_LOG` and
/// [`TracingError::InitializationFailed`] if a subscriber is already set.
pub fn init_logging(verbosity: u8) -> Result<(), TracingError> {
    let filter = env_filter(verbosity)?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .map_err(TracingError::init_failed)?;
    tracing::debug!(verbosity, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for_verbosity(0), LevelFilter::WARN);
        assert_eq!(level_for_verbosity(1), LevelFilter::INFO);
        assert_eq!(level_for_verbosity(2), LevelFilter::DEBUG);
        assert_eq!(level_for_verbosity(7), LevelFilter::TRACE);
    }
}
