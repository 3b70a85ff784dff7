//! Tracing subscriber setup with layered architecture
//!
//! Combines the tracing layers the service runs with:
//! - **OpenTelemetry layer**: exports spans to the OTLP collector, bound to
//!   the tracer provider handle held by the [`TracingGuard`]
//! - **Fmt layer**: console output
//! - **EnvFilter**: log level control via `RUST_LOG`
//!
//! When tracing is disabled the OpenTelemetry layer is simply absent and
//! request spans become no-ops; HTTP behavior is unchanged.

use crate::config::TracingConfig;
use crate::tracing::init::{init_tracing, TracingError, TracingGuard};
use opentelemetry::trace::TracerProvider as _;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber with layered architecture
///
/// Initializes the OpenTelemetry provider first (see
/// [`init_tracing`](crate::tracing::init::init_tracing) for the failure
/// semantics), then installs the global subscriber. The telemetry layer is
/// bound to a tracer taken from the guard's provider handle rather than a
/// global lookup.
///
/// # Errors
///
/// Returns [`TracingError::ProviderError`] if a global subscriber was
/// already installed, and propagates any exporter construction failure.
pub fn init_subscriber(config: &TracingConfig) -> Result<TracingGuard, TracingError> {
    let guard = init_tracing(config)?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(provider) = guard.provider() {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true);

        let telemetry_layer =
            tracing_opentelemetry::layer().with_tracer(provider.tracer("booksvc"));

        let subscriber = tracing_subscriber::registry()
            .with(telemetry_layer)
            .with(env_filter)
            .with(fmt_layer);

        tracing::subscriber::set_global_default(subscriber).map_err(|e| {
            TracingError::ProviderError(format!(
                "Failed to set global subscriber (may already be initialized): {}",
                e
            ))
        })?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true);

        let subscriber = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer);

        tracing::subscriber::set_global_default(subscriber).map_err(|e| {
            TracingError::ProviderError(format!(
                "Failed to set global subscriber (may already be initialized): {}",
                e
            ))
        })?;
    }

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscriber_init_disabled() {
        let config = TracingConfig {
            enabled: false,
            ..TracingConfig::default()
        };

        // May fail if a subscriber is already installed by another test in
        // this binary; either way the call must not panic.
        let _ = init_subscriber(&config);
    }
}
