//! HTTP server module
//!
//! Accepts connections, decorates every request with an OpenTelemetry span,
//! and routes to the handlers in [`crate::router`].
//!
//! Built directly on `hyper` and `tokio`: one spawned task per accepted
//! connection, HTTP/1.1, no shared mutable state between requests. Span
//! creation goes through the globally installed subscriber stack, so a
//! disabled tracer yields no-op spans and identical HTTP behavior.

use crate::config::Config;
use crate::router::{self, Route};
use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{self, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{body::Incoming, Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info, Instrument};

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind to address: {0}")]
    BindError(String),

    #[error("Server error: {0}")]
    RuntimeError(String),
}

/// HTTP server
///
/// Binds on construction so port 0 (OS-assigned) is usable in tests; the
/// actual bound address is available from [`Server::local_addr`].
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl Server {
    /// Create a new server bound to the configured address.
    ///
    /// A bind failure here is the caller's fatal path: the service refuses
    /// to run half-configured.
    pub async fn new(config: &Config) -> Result<Self, ServerError> {
        let addr: SocketAddr = config
            .server
            .address
            .parse()
            .map_err(|e| ServerError::BindError(format!("Invalid address: {}", e)))?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(format!("Failed to bind to {}: {}", addr, e)))?;

        let local_addr = listener
            .local_addr()
            .map_err(|e| ServerError::BindError(format!("Failed to get local address: {}", e)))?;

        info!("Server bound to {}", local_addr);

        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// The socket address the server is listening on
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Run the accept loop.
    ///
    /// Each connection is handled in its own tokio task. Accept and
    /// per-connection errors are logged and the loop continues; in normal
    /// operation this method never returns.
    pub async fn run(self) -> Result<(), ServerError> {
        info!("Server running at http://{}", self.local_addr);

        loop {
            let (stream, peer_addr) = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    continue;
                }
            };

            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let service = service_fn(handle_request);

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    error!("Error serving connection from {}: {}", peer_addr, e);
                }
            });
        }
    }
}

/// Handle a single request inside a per-request span.
///
/// Span naming and attributes follow the HTTP semantic conventions:
/// method, target, server kind, and the status code recorded once the
/// handler has produced a response.
async fn handle_request(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let span = tracing::info_span!(
        "http.request",
        http.method = %method,
        http.target = %path,
        otel.kind = "server",
        http.status_code = tracing::field::Empty,
    );

    async move {
        let response = route_request(&method, &path);
        let status = response.status();
        tracing::Span::current().record("http.status_code", status.as_u16() as u64);

        if status.is_client_error() || status.is_server_error() {
            tracing::warn!(status = status.as_u16(), "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), "Request handled");
        }

        Ok(response)
    }
    .instrument(span)
    .await
}

/// Resolve the route and build the response.
fn route_request(method: &Method, path: &str) -> Response<Full<Bytes>> {
    match Route::resolve(method, path) {
        Ok(Route::ListBooks) => json_response(StatusCode::OK, router::books_body()),
        Err(err) => json_response(err.status(), router::error_body(&err)),
    }
}

/// Build a JSON response without fallible header plumbing.
fn json_response(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}
