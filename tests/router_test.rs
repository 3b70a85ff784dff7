//! Tests for route resolution and response bodies

use booksvc::router::{books_body, error_body, Route, RouterError, BOOKS_MESSAGE};
use hyper::{Method, StatusCode};

#[test]
fn test_get_books_resolves() {
    assert_eq!(Route::resolve(&Method::GET, "/books").unwrap(), Route::ListBooks);
}

#[test]
fn test_books_body_is_the_exact_literal() {
    // The body is fixed and independent of tracer state.
    assert_eq!(books_body(), r#"{"message":"Hello, OpenTelemetry with Gin!"}"#);
    assert_eq!(BOOKS_MESSAGE, "Hello, OpenTelemetry with Gin!");
}

#[test]
fn test_non_get_methods_are_rejected() {
    for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
        let err = Route::resolve(&method, "/books").unwrap_err();
        assert!(matches!(err, RouterError::MethodNotAllowed(_)));
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}

#[test]
fn test_unknown_paths_are_not_found() {
    for path in ["/", "/book", "/books/1", "/library"] {
        let err = Route::resolve(&Method::GET, path).unwrap_err();
        assert!(matches!(err, RouterError::NotFound(_)));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}

#[test]
fn test_error_body_is_json_with_error_field() {
    let err = Route::resolve(&Method::GET, "/library").unwrap_err();
    let value: serde_json::Value = serde_json::from_str(&error_body(&err)).unwrap();
    assert!(value.get("error").is_some());
}
