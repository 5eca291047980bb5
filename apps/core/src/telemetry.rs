//! Tracing subscriber setup for the binary.

use tracing::subscriber::set_global_default;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::config::LogFormat;
use crate::error::AppError;

const APP_NAME: &str = "agribot";

/// `RUST_LOG` wins; otherwise `info` for everything.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_tracing(format: LogFormat) -> Result<(), AppError> {
    let registry = Registry::default().with(env_filter());

    let result = match format {
        LogFormat::Pretty => set_global_default(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            ),
        ),
        LogFormat::Json => set_global_default(
            registry
                .with(JsonStorageLayer)
                .with(BunyanFormattingLayer::new(APP_NAME.into(), std::io::stderr)),
        ),
    };

    result.map_err(|e| AppError::Config(format!("Failed to install tracing subscriber: {}", e)))
}
