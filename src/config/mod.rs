//! Configuration module for booksvc
//!
//! Configuration is read once from the process environment at startup and
//! is immutable afterwards. The structures keep serde derives so the
//! effective configuration can be logged or dumped as JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable holding the service name reported in trace resources.
pub const ENV_SERVICE_NAME: &str = "SERVICE_NAME";

/// Environment variable holding the OTLP collector endpoint.
pub const ENV_OTLP_ENDPOINT: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

/// Environment variable enabling plaintext transport (present + non-empty = true).
pub const ENV_INSECURE_MODE: &str = "INSECURE_MODE";

/// Validate that a URL starts with http:// or https://
fn is_valid_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Normalize an OTLP endpoint into a full URL.
///
/// The collector endpoint is commonly given as a bare `host:port` gRPC
/// target. The tonic exporter wants a URL, so a scheme is prefixed based on
/// the transport mode when none is present.
fn normalize_endpoint(endpoint: &str, insecure: bool) -> String {
    if is_valid_http_url(endpoint) {
        endpoint.to_string()
    } else if insecure {
        format!("http://{}", endpoint)
    } else {
        format!("https://{}", endpoint)
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub tracing: TracingConfig,
}

impl Config {
    /// Build the configuration from the process environment.
    ///
    /// Reads `SERVICE_NAME`, `OTEL_EXPORTER_OTLP_ENDPOINT` and
    /// `INSECURE_MODE`. Unset or empty variables fall back to defaults; the
    /// endpoint defaults to the conventional `http://localhost:4317`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let service_name = match std::env::var(ENV_SERVICE_NAME) {
            Ok(v) if !v.trim().is_empty() => v,
            _ => default_service_name(),
        };

        // Presence of a non-empty value is what turns insecure mode on.
        let insecure = std::env::var(ENV_INSECURE_MODE)
            .map(|v| !v.is_empty())
            .unwrap_or(false);

        let endpoint = match std::env::var(ENV_OTLP_ENDPOINT) {
            Ok(v) if !v.trim().is_empty() => normalize_endpoint(v.trim(), insecure),
            _ => default_otlp_endpoint(),
        };

        let config = Config {
            server: ServerConfig::default(),
            tracing: TracingConfig {
                enabled: true,
                service_name,
                otlp: OtlpConfig {
                    endpoint,
                    insecure,
                    timeout_seconds: default_otlp_timeout(),
                },
                batch: BatchConfig::default(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tracing.enabled {
            if !is_valid_http_url(&self.tracing.otlp.endpoint) {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid OTLP endpoint '{}': must start with http:// or https://",
                    self.tracing.otlp.endpoint
                )));
            }

            if self.tracing.otlp.timeout_seconds == 0 {
                return Err(ConfigError::ValidationError(
                    "OTLP export timeout must be greater than zero".into(),
                ));
            }

            if self.tracing.batch.max_queue_size == 0 {
                return Err(ConfigError::ValidationError(
                    "Batch max_queue_size must be greater than zero".into(),
                ));
            }

            if self.tracing.batch.max_export_batch_size == 0 {
                return Err(ConfigError::ValidationError(
                    "Batch max_export_batch_size must be greater than zero".into(),
                ));
            }

            if self.tracing.batch.max_export_batch_size > self.tracing.batch.max_queue_size {
                return Err(ConfigError::ValidationError(format!(
                    "Batch max_export_batch_size ({}) cannot exceed max_queue_size ({})",
                    self.tracing.batch.max_export_batch_size, self.tracing.batch.max_queue_size
                )));
            }
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address. Default: all interfaces, port 8090.
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "0.0.0.0:8090".to_string()
}

// ============================================================================
// Tracing Configuration
// ============================================================================

/// OpenTelemetry distributed tracing configuration.
///
/// Spans are exported over OTLP/gRPC to the configured collector endpoint
/// (Jaeger, Tempo, or any OTLP-compatible backend). Sampling is always-on;
/// this service is low-traffic by design and records every span.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracingConfig {
    /// Enable or disable span export. When disabled the service still runs
    /// with console logging only and spans are no-ops. Default: true
    #[serde(default = "default_tracing_enabled")]
    pub enabled: bool,

    /// Service name recorded in the trace resource. Default: "booksvc"
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// OTLP exporter configuration
    #[serde(default)]
    pub otlp: OtlpConfig,

    /// Batch span processor configuration
    #[serde(default)]
    pub batch: BatchConfig,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: default_tracing_enabled(),
            service_name: default_service_name(),
            otlp: OtlpConfig::default(),
            batch: BatchConfig::default(),
        }
    }
}

fn default_tracing_enabled() -> bool {
    true
}

fn default_service_name() -> String {
    "booksvc".to_string()
}

/// OTLP (OpenTelemetry Protocol) exporter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtlpConfig {
    /// OTLP collector endpoint URL. Must start with http:// or https://
    #[serde(default = "default_otlp_endpoint")]
    pub endpoint: String,

    /// Use plaintext gRPC instead of TLS. When false, TLS with the system
    /// root certificate store is used. Default: false
    #[serde(default)]
    pub insecure: bool,

    /// Timeout for OTLP export in seconds. This also bounds the flush
    /// performed at shutdown. Default: 10
    #[serde(default = "default_otlp_timeout")]
    pub timeout_seconds: u64,
}

impl Default for OtlpConfig {
    fn default() -> Self {
        Self {
            endpoint: default_otlp_endpoint(),
            insecure: false,
            timeout_seconds: default_otlp_timeout(),
        }
    }
}

fn default_otlp_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_otlp_timeout() -> u64 {
    10
}

/// Batch span processor configuration.
///
/// Spans are buffered in memory and exported in groups, so request handling
/// never waits on exporter network I/O.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Maximum number of spans to queue before dropping. Default: 2048
    #[serde(default = "default_max_queue_size")]
    pub max_queue_size: usize,

    /// Delay in milliseconds between scheduled exports. Default: 5000
    #[serde(default = "default_scheduled_delay")]
    pub scheduled_delay_millis: u64,

    /// Maximum number of spans per export batch. Default: 512
    #[serde(default = "default_max_export_batch_size")]
    pub max_export_batch_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_queue_size: default_max_queue_size(),
            scheduled_delay_millis: default_scheduled_delay(),
            max_export_batch_size: default_max_export_batch_size(),
        }
    }
}

fn default_max_queue_size() -> usize {
    2048
}

fn default_scheduled_delay() -> u64 {
    5000
}

fn default_max_export_batch_size() -> usize {
    512
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.address, "0.0.0.0:8090");
        assert_eq!(config.tracing.otlp.endpoint, "http://localhost:4317");
        assert!(config.tracing.enabled);
        assert!(!config.tracing.otlp.insecure);
    }

    #[test]
    fn test_normalize_endpoint_bare_host_port() {
        assert_eq!(
            normalize_endpoint("collector:4317", true),
            "http://collector:4317"
        );
        assert_eq!(
            normalize_endpoint("collector:4317", false),
            "https://collector:4317"
        );
    }

    #[test]
    fn test_normalize_endpoint_keeps_explicit_scheme() {
        assert_eq!(
            normalize_endpoint("http://collector:4317", false),
            "http://collector:4317"
        );
        assert_eq!(
            normalize_endpoint("https://collector:4317", true),
            "https://collector:4317"
        );
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let mut config = Config::default();
        config.tracing.otlp.endpoint = "unix:///tmp/otlp.sock".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("OTLP endpoint"));
    }

    #[test]
    fn test_validate_rejects_zero_batch_sizes() {
        let mut config = Config::default();
        config.tracing.batch.max_queue_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.tracing.batch.max_export_batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_batch_larger_than_queue() {
        let mut config = Config::default();
        config.tracing.batch.max_queue_size = 128;
        config.tracing.batch.max_export_batch_size = 256;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_skips_tracing_checks_when_disabled() {
        let mut config = Config::default();
        config.tracing.enabled = false;
        config.tracing.otlp.endpoint = "not-a-url".into();
        assert!(config.validate().is_ok());
    }
}
