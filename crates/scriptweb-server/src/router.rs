//! Application router builder.
//!
//! [`build_router`] is shared by the server and the HTTP tests so both run
//! the same middleware stack.

use crate::handlers::{self, AppState, REQUEST_ID_HEADER};
use axum::http::HeaderName;
use axum::routing::get;
use axum::Router;
use scriptweb_config::ServerConfig;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Page and API routes, without middleware
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/Home", get(handlers::index))
        .route("/Home/Index", get(handlers::index))
        .route("/Home/Error", get(handlers::error_page))
        .route("/api/run", get(handlers::api_run))
        .with_state(state)
}

/// Wrap `router` in the middleware stack.
///
/// Applied bottom-up:
///
/// 1. Set request ID on incoming requests
/// 2. Structured request/response tracing
/// 3. Propagate request ID to response
/// 4. Request timeout
/// 5. Panic recovery (render the error page with status 500)
pub fn apply_layers(router: Router, config: &ServerConfig) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);
    let show_details = config.environment.is_development();

    router
        .layer(CatchPanicLayer::custom(move |err| {
            handlers::panic_response(err, show_details)
        }))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
}

/// Build the full application [`Router`]
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    apply_layers(routes(state), config)
}
