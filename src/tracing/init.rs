//! OpenTelemetry tracer initialization and lifecycle management
//!
//! This module handles the initialization of the OpenTelemetry tracer
//! provider, OTLP exporter configuration, and graceful shutdown with span
//! flushing.

use crate::config::TracingConfig;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::{
    BatchConfig as SdkBatchConfig, BatchSpanProcessor, Config as SdkTraceConfig, Sampler,
    TracerProvider,
};
use opentelemetry_sdk::{runtime, Resource};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tonic::transport::ClientTlsConfig;

/// Errors that can occur during tracing initialization or shutdown
#[derive(Error, Debug)]
pub enum TracingError {
    #[error("Invalid OTLP endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Failed to initialize OTLP exporter: {0}")]
    ExporterError(String),

    #[error("Failed to initialize tracer provider: {0}")]
    ProviderError(String),

    #[error("Failed to flush spans at shutdown: {0}")]
    ShutdownError(String),
}

/// RAII guard for tracing lifecycle management
///
/// Holds the tracer provider handle so callers can bind tracers explicitly
/// instead of going through the global registry. When dropped, any pending
/// spans are flushed best-effort and the global provider is shut down.
///
/// Prefer [`shutdown_tracing`] over relying on `Drop`: it surfaces flush
/// errors, and because it consumes the guard a second shutdown does not
/// typecheck.
#[derive(Debug)]
pub struct TracingGuard {
    provider: Option<Arc<TracerProvider>>,
    active: bool,
}

impl TracingGuard {
    /// Create a new tracing guard with an active tracer provider
    fn new(provider: TracerProvider) -> Self {
        Self {
            provider: Some(Arc::new(provider)),
            active: true,
        }
    }

    /// Create an inactive guard (when tracing is disabled)
    fn inactive() -> Self {
        Self {
            provider: None,
            active: false,
        }
    }

    /// Check if tracing is active
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The tracer provider handle, if tracing is active
    pub fn provider(&self) -> Option<&TracerProvider> {
        self.provider.as_deref()
    }
}

impl Drop for TracingGuard {
    fn drop(&mut self) {
        if self.active {
            // Best effort: flush errors at teardown must never block exit.
            if let Some(provider) = &self.provider {
                for result in provider.force_flush() {
                    if let Err(e) = result {
                        tracing::warn!("Failed to flush spans on drop: {}", e);
                    }
                }
            }
            global::shutdown_tracer_provider();
        }
    }
}

/// Initialize OpenTelemetry tracing with the given configuration
///
/// Builds the OTLP/gRPC span exporter, a batch span processor, and a tracer
/// provider with always-on sampling and a service-identifying resource. The
/// provider is installed as the global default and also retained in the
/// returned [`TracingGuard`].
///
/// Transport security follows `config.otlp.insecure`: plaintext gRPC when
/// set, otherwise TLS validated against the system root certificate store.
///
/// # Errors
///
/// Exporter construction failure is the caller's fatal path: a service that
/// cannot reach the point of exporting traces is considered misconfigured.
/// Resource construction, by contrast, degrades: a blank service name logs
/// a warning and the provider proceeds with an empty resource.
pub fn init_tracing(config: &TracingConfig) -> Result<TracingGuard, TracingError> {
    if !config.enabled {
        return Ok(TracingGuard::inactive());
    }

    let endpoint = &config.otlp.endpoint;
    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return Err(TracingError::InvalidEndpoint(format!(
            "Endpoint must start with http:// or https://, got: {}",
            endpoint
        )));
    }

    let mut exporter_builder = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(endpoint.clone())
        .with_timeout(Duration::from_secs(config.otlp.timeout_seconds));

    if !config.otlp.insecure {
        // System root CAs; no certificate material is configured here.
        exporter_builder = exporter_builder.with_tls_config(ClientTlsConfig::new());
    }

    let exporter = opentelemetry_otlp::SpanExporterBuilder::from(exporter_builder)
        .build_span_exporter()
        .map_err(|e| TracingError::ExporterError(e.to_string()))?;

    let batch_config = SdkBatchConfig::default()
        .with_max_queue_size(config.batch.max_queue_size)
        .with_scheduled_delay(Duration::from_millis(config.batch.scheduled_delay_millis))
        .with_max_export_batch_size(config.batch.max_export_batch_size);

    let processor = BatchSpanProcessor::builder(exporter, runtime::Tokio)
        .with_batch_config(batch_config)
        .build();

    let provider = TracerProvider::builder()
        .with_span_processor(processor)
        .with_config(
            SdkTraceConfig::default()
                .with_sampler(Sampler::AlwaysOn)
                .with_resource(build_resource(&config.service_name)),
        )
        .build();

    global::set_tracer_provider(provider.clone());

    Ok(TracingGuard::new(provider))
}

/// Build the resource descriptor attached to every exported span.
///
/// A blank service name is the degrade path: spans go out untagged rather
/// than failing initialization.
fn build_resource(service_name: &str) -> Resource {
    if service_name.trim().is_empty() {
        tracing::warn!("Service name is empty, proceeding with an untagged trace resource");
        return Resource::empty();
    }

    Resource::new(vec![
        KeyValue::new("service.name", service_name.to_string()),
        KeyValue::new("service.version", crate::VERSION),
        KeyValue::new("library.language", "rust"),
    ])
}

/// Explicitly shutdown tracing and flush all pending spans
///
/// Flushes the batch queue (a no-op when no spans were recorded) and shuts
/// down the global tracer provider. Consumes the guard, so shutting down
/// twice is a compile error rather than a runtime question.
///
/// The flush is bounded by the exporter timeout configured at init; on
/// failure the error is returned and the caller's exit sequence proceeds
/// regardless.
pub fn shutdown_tracing(mut guard: TracingGuard) -> Result<(), TracingError> {
    if guard.active {
        if let Some(provider) = &guard.provider {
            for result in provider.force_flush() {
                result.map_err(|e| TracingError::ShutdownError(e.to_string()))?;
            }
        }
        // Mark inactive so Drop does not flush a second time.
        guard.active = false;
        global::shutdown_tracer_provider();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TracingConfig;

    #[test]
    fn test_disabled_config_yields_inactive_guard() {
        let config = TracingConfig {
            enabled: false,
            ..TracingConfig::default()
        };

        let guard = init_tracing(&config).unwrap();
        assert!(!guard.is_active());
        assert!(guard.provider().is_none());
    }

    #[test]
    fn test_invalid_endpoint_is_rejected_before_exporter_build() {
        let mut config = TracingConfig::default();
        config.otlp.endpoint = "collector:4317".into();

        let err = init_tracing(&config).unwrap_err();
        assert!(matches!(err, TracingError::InvalidEndpoint(_)));
    }

    #[test]
    fn test_shutdown_of_inactive_guard_is_ok() {
        let guard = TracingGuard::inactive();
        assert!(shutdown_tracing(guard).is_ok());
    }

    #[test]
    fn test_resource_for_blank_service_name_is_empty() {
        let resource = build_resource("   ");
        assert_eq!(resource.len(), 0);
    }
}
