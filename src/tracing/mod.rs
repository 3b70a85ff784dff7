//! OpenTelemetry distributed tracing module
//!
//! Provides OTLP/gRPC span export for distributed tracing against Jaeger,
//! Tempo, or any OTLP-compatible collector.
//!
//! # Features
//!
//! - OTLP gRPC export, plaintext or TLS with system root CAs
//! - Always-on sampling with a service-identifying resource
//! - Batch span processing so request handling never waits on export I/O
//! - Graceful shutdown with span flushing, double-shutdown-proof by
//!   construction
//!
//! # Example
//!
//! ```no_run
//! use booksvc::config::TracingConfig;
//! use booksvc::tracing::{init_subscriber, shutdown_tracing};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TracingConfig::default();
//! let guard = init_subscriber(&config)?;
//! // spans now flow to the collector; flush on the way out
//! shutdown_tracing(guard)?;
//! # Ok(())
//! # }
//! ```

pub mod init;
pub mod subscriber;

pub use init::{init_tracing, shutdown_tracing, TracingError, TracingGuard};
pub use subscriber::init_subscriber;
