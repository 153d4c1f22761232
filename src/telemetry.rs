//! Log subscriber setup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

use crate::config::TelemetryConfig;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Fails if a global
/// subscriber is already installed, so callers that may init twice (tests)
/// can ignore the error.
pub fn init(config: &TelemetryConfig) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let json_layer = config
        .json
        .then(|| tracing_subscriber::fmt::layer().json().with_current_span(false));
    let plain_layer = (!config.json).then(|| tracing_subscriber::fmt::layer());

    tracing_subscriber::registry()
        .with(json_layer)
        .with(plain_layer)
        .with(env_filter)
        .try_init()?;

    tracing::debug!(json = config.json, "telemetry initialised");
    Ok(())
}
