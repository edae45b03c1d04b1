//! Test helper functions

use serde_json::Value;
use std::sync::Once;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static INIT_LOGGER: Once = Once::new();

/// Initialize test logging
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// Answer `verb path` with `status` and a JSON body
pub async fn mount_json(server: &MockServer, verb: &str, route: &str, status: u16, body: Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Answer `verb path` with 401 and a FastAPI-style detail
pub async fn mount_unauthorized(server: &MockServer, verb: &str, route: &str) {
    mount_json(
        server,
        verb,
        route,
        401,
        serde_json::json!({"detail": "Could not validate credentials"}),
    )
    .await;
}

/// Requests the mock server has seen for `route`
pub async fn requests_to(server: &MockServer, route: &str) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == route)
        .collect()
}
