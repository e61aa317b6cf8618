//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence over the configured level. Records emitted
//! through the `log` facade are forwarded into tracing.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::InkpressError;

/// Builds the filter from `RUST_LOG`, falling back to `config.level`.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, InkpressError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| InkpressError::Logging(format!("invalid level '{}': {}", config.level, e))),
    }
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), InkpressError> {
    let filter = build_filter(config)?;

    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => fmt::layer().with_target(true).boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(fmt_layer).with(filter);

    tracing_log::LogTracer::init().map_err(|e| InkpressError::Logging(e.to_string()))?;
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| InkpressError::Logging(e.to_string()))
}
