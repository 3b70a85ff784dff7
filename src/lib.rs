//! booksvc library
//!
//! A single-endpoint HTTP service wired into a distributed-tracing
//! pipeline. The interesting surface is the tracer bootstrap: an OTLP/gRPC
//! exporter, a batching tracer provider tagged with service attributes, and
//! a flush-on-shutdown lifecycle. The HTTP side is one route, `GET /books`,
//! decorated with a span per request.
//!
//! # Example
//!
//! ```no_run
//! use booksvc::{config::Config, server::Server, tracing::init_subscriber};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let _guard = init_subscriber(&config.tracing)?;
//!     let server = Server::new(&config).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod router;
pub mod server;
pub mod tracing;

// Re-export commonly used types
pub use config::Config;
pub use server::Server;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
