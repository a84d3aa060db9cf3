#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::routing::get as route_get;
use axum::Router;
use scriptweb_config::{Config, ConfigBuilder, Environment, ScriptVariant};
use scriptweb_scripting::ScriptSource;
use scriptweb_server::router::{apply_layers, routes};
use scriptweb_server::AppState;
use tower::ServiceExt;

/// Default configuration: copy variant, development environment
pub fn test_config() -> Config {
    ConfigBuilder::new().build().unwrap()
}

/// Configuration running `code` as a custom script
pub fn custom_config(code: &str) -> Config {
    ConfigBuilder::new()
        .custom_source(ScriptSource::inline_named(code, "custom.rhai"))
        .build()
        .unwrap()
}

/// The full application router for `config`
pub fn build_test_app(config: &Config) -> Router {
    let state = AppState::from_config(config).unwrap();
    apply_layers(routes(state), &config.server)
}

/// The application plus a `/boom` route that panics
pub fn build_panicking_app(environment: Environment) -> Router {
    let config = ConfigBuilder::new()
        .variant(ScriptVariant::Copy)
        .environment(environment)
        .build()
        .unwrap();
    let state = AppState::from_config(&config).unwrap();
    let router = routes(state).route("/boom", route_get(boom));
    apply_layers(router, &config.server)
}

async fn boom() -> &'static str {
    panic!("handler exploded")
}

/// Send a GET request
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

/// Send an arbitrary request
pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

/// Read the body as UTF-8 text
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Read the body as JSON
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
