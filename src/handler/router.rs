//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, health probes,
//! then template resolution. Every pipeline error is converted to a response
//! here; nothing below this point writes to the client.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, ACCEPT, LOCATION, REFERER, USER_AGENT};
use hyper::{Method, Request, Response};

use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let response = route_request(&req, &state).await;

    if state.config.logging.access_log {
        let entry = access_entry(&req, &response, peer_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn route_request<B>(req: &Request<B>, state: &AppState) -> Response<Full<Bytes>> {
    let method = req.method();
    let is_head = *method == Method::HEAD;

    // 1. Check HTTP method
    match method {
        &Method::GET | &Method::HEAD => {}
        &Method::OPTIONS => return http::build_options_response(),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            return http::build_405_response();
        }
    }

    let path = req.uri().path();

    // 2. Health probes
    let health = &state.config.health;
    if health.enabled && (path == health.liveness_path || path == health.readiness_path) {
        return http::build_health_response("ok", is_head);
    }

    // 3. Template redirect
    match state
        .resolver
        .redirect_target(path, req.uri().query())
        .await
    {
        Ok(target) => http::build_redirect_response(&target, is_head),
        Err(err) => {
            logger::log_debug(&format!("[{}] {path}: {err}", err.kind()));
            http::build_error_response(&err, wants_json(req), is_head)
        }
    }
}

/// Whether the client prefers a JSON error body
fn wants_json<B>(req: &Request<B>) -> bool {
    req.headers()
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

fn access_entry<B>(
    req: &Request<B>,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
        .unwrap_or(usize::MAX);
    entry.location = response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    entry.error_kind = response
        .headers()
        .get(http::response::ERROR_KIND_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::resolve::testing::FakeUpstream;
    use crate::upstream::Upstream;
    use http_body_util::BodyExt;
    use hyper::header::CONTENT_TYPE;
    use hyper::StatusCode;

    fn state(upstream: &Arc<FakeUpstream>) -> Arc<AppState> {
        let mut config = Config::load_from("does-not-exist-redirect-config").unwrap();
        config.logging.access_log = false;
        Arc::new(AppState::new(
            config,
            Arc::clone(upstream) as Arc<dyn Upstream>,
        ))
    }

    fn upstream() -> Arc<FakeUpstream> {
        Arc::new(
            FakeUpstream::default()
                .with_listing("latest", &["basics", "blog", "minimal"])
                .with_listing("astro@v1.2.3", &["my-template"])
                .with_release("v1.2.3"),
        )
    }

    fn get(uri: &str) -> Request<()> {
        Request::builder().uri(uri).body(()).unwrap()
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    async fn body_string(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_release_redirect_to_github() {
        let upstream = upstream();
        let response = handle_request(get("/my-template@v1.2.3?on=github"), state(&upstream), peer())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[LOCATION],
            "https://github.com/withastro/astro/tree/astro@v1.2.3/examples/my-template"
        );
    }

    #[tokio::test]
    async fn test_default_platform_is_stackblitz() {
        let upstream = upstream();
        let response = handle_request(get("/blog"), state(&upstream), peer())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[LOCATION],
            "https://stackblitz.com/github/withastro/astro/tree/latest/examples/blog"
        );
    }

    #[tokio::test]
    async fn test_unknown_template_is_404_with_listing() {
        let upstream = upstream();
        let response = handle_request(get("/does-not-exist"), state(&upstream), peer())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_string(response).await,
            "Unable to find does-not-exist! Supported templates are:\n  - basics\n  - blog\n  - minimal"
        );
    }

    #[tokio::test]
    async fn test_bogus_version_is_400() {
        let upstream = upstream();
        let response = handle_request(get("/my-template@bogus-version"), state(&upstream), peer())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[http::response::ERROR_KIND_HEADER],
            "invalid_version"
        );
        let body = body_string(response).await;
        assert!(body.starts_with("Invalid version \"bogus-version\"!"));
        assert!(body.contains("\"next\", \"latest\""));
    }

    #[tokio::test]
    async fn test_version_token_is_escaped_in_html_body() {
        let upstream = upstream();
        let response = handle_request(
            get("/basics@%3Cscript%3Ealert(1)%3C/script%3E"),
            state(&upstream),
            peer(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/html; charset=utf-8");
        let body = body_string(response).await;
        assert!(body.starts_with(
            "Invalid version \"&lt;script&gt;alert(1)&lt;/script&gt;\"!"
        ));
        assert!(!body.contains("<script>"));
    }

    #[tokio::test]
    async fn test_unsupported_platform_is_400_without_upstream_calls() {
        let upstream = upstream();
        let response = handle_request(
            get("/my-template@bogus-version?on=unsupported-platform"),
            state(&upstream),
            peer(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(upstream.calls(), 0);
        assert!(body_string(response).await.contains("  - codesandbox"));
    }

    #[tokio::test]
    async fn test_json_error_body() {
        let upstream = upstream();
        let req = Request::builder()
            .uri("/basics?on=vercel")
            .header(ACCEPT, "application/json")
            .body(())
            .unwrap();
        let response = handle_request(req, state(&upstream), peer()).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"]["kind"], "unsupported_platform");
    }

    #[tokio::test]
    async fn test_health_probe_skips_resolution() {
        let upstream = upstream();
        let response = handle_request(get("/healthz"), state(&upstream), peer())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "ok");
        assert_eq!(upstream.calls(), 0);
    }

    #[tokio::test]
    async fn test_methods() {
        let upstream = upstream();
        let state = state(&upstream);

        let post = Request::builder().method(Method::POST).uri("/basics").body(()).unwrap();
        let response = handle_request(post, Arc::clone(&state), peer()).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let options = Request::builder().method(Method::OPTIONS).uri("/basics").body(()).unwrap();
        let response = handle_request(options, Arc::clone(&state), peer()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let head = Request::builder().method(Method::HEAD).uri("/basics").body(()).unwrap();
        let response = handle_request(head, state, peer()).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert!(body_string(response).await.is_empty());
        assert_eq!(upstream.calls(), 1);
    }

    #[test]
    fn test_access_entry_records_redirect() {
        let req = Request::builder()
            .uri("/blog?on=netlify")
            .header(USER_AGENT, "curl/8.0")
            .body(())
            .unwrap();
        let response = http::build_redirect_response("https://astro.build", false);
        let entry = access_entry(&req, &response, peer(), Instant::now());

        assert_eq!(entry.remote_addr, "127.0.0.1");
        assert_eq!(entry.status, 302);
        assert_eq!(entry.query.as_deref(), Some("on=netlify"));
        assert_eq!(entry.location.as_deref(), Some("https://astro.build"));
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(entry.body_bytes, "Redirecting...".len());
        assert!(entry.error_kind.is_none());
    }
}
