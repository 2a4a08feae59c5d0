//! HTTP response building module
//!
//! Provides builders for the responses the redirect server sends.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW, CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
use hyper::{Response, StatusCode};

use crate::error::RedirectError;

/// Header carrying the machine-readable error kind
pub const ERROR_KIND_HEADER: &str = "x-redirect-error";

const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Build 302 redirect response
pub fn build_redirect_response(target: &str, is_head: bool) -> Response<Full<Bytes>> {
    let body = if is_head { "" } else { "Redirecting..." };
    Response::builder()
        .status(StatusCode::FOUND)
        .header(LOCATION, target)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error("302", &e);
            fallback(StatusCode::BAD_GATEWAY)
        })
}

/// Build a plain body response with an explicit content type
pub fn build_text_response(
    status: StatusCode,
    content_type: &str,
    body: String,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = body.len();
    let body = if is_head { Bytes::new() } else { Bytes::from(body) };

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            fallback(status)
        })
}

/// Render a pipeline failure
///
/// Browsers get the message as the body; clients asking for JSON get
/// `{"error":{"kind":..,"message":..}}`. The kind header is always set.
pub fn build_error_response(
    err: &RedirectError,
    wants_json: bool,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let status = StatusCode::from_u16(err.status()).unwrap_or(StatusCode::BAD_REQUEST);
    let (content_type, body) = if wants_json {
        let body = serde_json::json!({
            "error": {
                "kind": err.kind(),
                "message": err.to_string(),
            }
        });
        ("application/json", body.to_string())
    } else if matches!(err, RedirectError::TemplateNotFound { .. }) {
        ("text/plain; charset=utf-8", err.to_string())
    } else {
        // Version errors embed a link to the release listing
        ("text/html; charset=utf-8", err.to_string())
    };

    let mut response = build_text_response(status, content_type, body, is_head);
    response
        .headers_mut()
        .insert(ERROR_KIND_HEADER, HeaderValue::from_static(err.kind()));
    response
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header(CONTENT_TYPE, "text/plain")
        .header(ALLOW, ALLOWED_METHODS)
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            fallback(StatusCode::METHOD_NOT_ALLOWED)
        })
}

/// Build OPTIONS response
pub fn build_options_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, ALLOWED_METHODS)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            fallback(StatusCode::NO_CONTENT)
        })
}

/// Build health check response
pub fn build_health_response(status: &str, is_head: bool) -> Response<Full<Bytes>> {
    build_text_response(
        StatusCode::OK,
        "text/plain",
        status.to_string(),
        is_head,
    )
}

fn fallback(status: StatusCode) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
