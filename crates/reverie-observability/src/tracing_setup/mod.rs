//! Global subscriber installation.

pub mod spans;

use std::sync::Mutex;

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use reverie_core::config::ObservabilityConfig;
use reverie_core::errors::{ReverieError, ReverieResult};

static INSTALLED: Mutex<bool> = Mutex::new(false);

/// Build the filter: `RUST_LOG` wins, otherwise the configured level.
pub fn build_filter(config: &ObservabilityConfig) -> ReverieResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| {
            ReverieError::ConfigError(format!("invalid log level '{}': {e}", config.log_level))
        }),
    }
}

/// Install the global fmt subscriber. Returns `false` if a subscriber was
/// already installed (by this function or anyone else).
pub fn init_tracing(config: &ObservabilityConfig) -> ReverieResult<bool> {
    let mut installed = INSTALLED
        .lock()
        .map_err(|e| ReverieError::ConcurrencyError(format!("tracing init lock poisoned: {e}")))?;
    if *installed {
        return Ok(false);
    }

    let filter = build_filter(config)?;
    let result = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
    };

    // try_init fails only when another global subscriber exists.
    *installed = true;
    match result {
        Ok(()) => {
            tracing::debug!(level = %config.log_level, json = config.json, "tracing initialized");
            Ok(true)
        }
        Err(_) => Ok(false),
    }
}
