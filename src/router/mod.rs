//! Request router
//!
//! Resolves incoming requests to the service's route table and builds the
//! JSON bodies for both the success and error paths. The HTTP machinery
//! itself lives in [`crate::server`]; this module is pure request-shape
//! logic so it stays trivially unit-testable.

use hyper::{Method, StatusCode};
use serde_json::json;
use thiserror::Error;

/// Router errors
#[derive(Error, Debug)]
pub enum RouterError {
    #[error("No route for path: {0}")]
    NotFound(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),
}

impl RouterError {
    /// HTTP status code this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            RouterError::NotFound(_) => StatusCode::NOT_FOUND,
            RouterError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

/// Routes exposed by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// GET /books
    ListBooks,
}

impl Route {
    /// Resolve a method + path pair against the route table.
    pub fn resolve(method: &Method, path: &str) -> Result<Route, RouterError> {
        match path {
            "/books" => {
                if method == Method::GET {
                    Ok(Route::ListBooks)
                } else {
                    Err(RouterError::MethodNotAllowed(format!(
                        "{} {}",
                        method, path
                    )))
                }
            }
            _ => Err(RouterError::NotFound(path.to_string())),
        }
    }
}

/// The fixed message returned by `GET /books`.
pub const BOOKS_MESSAGE: &str = "Hello, OpenTelemetry with Gin!";

/// JSON body for the books route.
///
/// The body is a fixed literal independent of tracer state.
pub fn books_body() -> String {
    json!({ "message": BOOKS_MESSAGE }).to_string()
}

/// JSON error body for a failed route resolution.
pub fn error_body(err: &RouterError) -> String {
    json!({ "error": err.to_string() }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_get_books() {
        let route = Route::resolve(&Method::GET, "/books").unwrap();
        assert_eq!(route, Route::ListBooks);
    }

    #[test]
    fn test_resolve_wrong_method_on_books() {
        let err = Route::resolve(&Method::POST, "/books").unwrap_err();
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_resolve_unknown_path() {
        let err = Route::resolve(&Method::GET, "/shelves").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_books_body_is_exact_literal() {
        assert_eq!(
            books_body(),
            r#"{"message":"Hello, OpenTelemetry with Gin!"}"#
        );
    }

    #[test]
    fn test_error_body_carries_error_field() {
        let err = Route::resolve(&Method::GET, "/missing").unwrap_err();
        let body: serde_json::Value = serde_json::from_str(&error_body(&err)).unwrap();
        assert!(body["error"].as_str().unwrap().contains("/missing"));
    }
}
