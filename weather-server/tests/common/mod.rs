// Not every helper is used in every test
#![allow(dead_code)]

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use weather_core::{ProxyConfig, WeatherProxy};
use weather_server::server;
use wiremock::MockServer;

pub const ALLOWED_ORIGIN: &str = "http://localhost:5173";

pub fn setup_test_env() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init()
        .ok();
}

/// Router wired to a wiremock upstream
pub struct TestSetup {
    pub router: Router,
    pub upstream: MockServer,
}

impl TestSetup {
    pub async fn new() -> Self {
        setup_test_env();

        let upstream = MockServer::start().await;

        let mut config = ProxyConfig::new("TEST_KEY");
        config.upstream_url = format!("{}/data/2.5/weather", upstream.uri());
        config.upstream_timeout = Duration::from_millis(500);

        let proxy = WeatherProxy::from_config(&config).expect("Failed to build proxy");
        let router = server::router(proxy, &config);

        Self { router, upstream }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.expect("Router failed")
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        let request = Request::builder()
            .uri(uri)
            .method("GET")
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    pub async fn get_with_origin(&self, uri: &str, origin: &str) -> Response<Body> {
        let request = Request::builder()
            .uri(uri)
            .method("GET")
            .header("Origin", origin)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }

    pub async fn preflight(&self, uri: &str, origin: &str) -> Response<Body> {
        let request = Request::builder()
            .uri(uri)
            .method("OPTIONS")
            .header("Origin", origin)
            .header("Access-Control-Request-Method", "GET")
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(request).await
    }
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.expect("Failed to read body").to_bytes();
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).expect("Body is not JSON")
}
