//! HTTP tests for the pages, the JSON endpoint and the middleware stack.

mod common;

use axum::body::Body;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{Request, StatusCode};
use common::{body_json, body_text, build_panicking_app, build_test_app, custom_config, get};
use scriptweb_config::Environment;

#[tokio::test]
async fn index_renders_copied_person() {
    let app = build_test_app(&common::test_config());
    let response = get(app, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[CONTENT_TYPE].to_str().unwrap().to_owned();
    assert!(content_type.starts_with("text/html"), "{content_type}");

    let html = body_text(response).await;
    assert!(html.contains("Frank R-I-Z-Z-O Rizzo"));
    assert!(html.contains("The scripted person equals the original."));
    assert!(html.contains("Rizzo"));
    assert!(html.contains("Compile"));
}

#[tokio::test]
async fn home_routes_render_index() {
    for uri in ["/Home", "/Home/Index"] {
        let app = build_test_app(&common::test_config());
        let response = get(app, uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn index_still_renders_when_script_fails() {
    let config = custom_config("let born = parse_date(\"not-a-date\");\nPerson()");
    let response = get(build_test_app(&config), "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("run stage failed"));
    assert!(html.contains("was not recognized as a valid date."));
}

#[tokio::test]
async fn index_shows_compile_diagnostics() {
    let config = custom_config("let p = Person();\np.LastName = ;\np");
    let html = body_text(get(build_test_app(&config), "/").await).await;

    assert!(html.contains("compile stage failed"));
    assert!(html.contains("Diagnostics"));
}

#[tokio::test]
async fn api_run_returns_report() {
    let app = build_test_app(&common::test_config());
    let response = get(app, "/api/run").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["people_equal"], true);
    assert_eq!(json["script_name"], "copy_person.rhai");
    assert!(json["original_person_json"]
        .as_str()
        .unwrap()
        .contains("\"FirstName\": \"Frank\""));
    assert!(json.get("failure").is_none());
    assert!(json["timings"]["run"]["elapsed"].is_string());
}

#[tokio::test]
async fn api_run_reports_failure() {
    let config = custom_config("let p = Person();\np.LastName = Surname;\np");
    let json = body_json(get(build_test_app(&config), "/api/run").await).await;

    assert_eq!(json["people_equal"], false);
    assert_eq!(json["failure"]["stage"], "compile");
    assert_eq!(json["scripted_person_json"], "");
}

#[tokio::test]
async fn error_page_echoes_request_id() {
    let app = build_test_app(&common::test_config());
    let request = Request::get("/Home/Error")
        .header("x-request-id", "req-1234")
        .body(Body::empty())
        .unwrap();
    let response = common::send(app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-1234");
    assert_eq!(response.headers()[CACHE_CONTROL], "no-store, no-cache");

    let html = body_text(response).await;
    assert!(html.contains("req-1234"));
}

#[tokio::test]
async fn error_page_generates_request_id() {
    let app = build_test_app(&common::test_config());
    let response = get(app, "/Home/Error").await;

    let request_id = response.headers()["x-request-id"].to_str().unwrap().to_owned();
    assert_eq!(request_id.len(), 36, "x-request-id should be a UUID string");

    let html = body_text(response).await;
    assert!(html.contains(&request_id));
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_test_app(&common::test_config());
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn panic_renders_error_page() {
    let response = get(build_panicking_app(Environment::Development), "/boom").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().contains_key("x-request-id"));

    let html = body_text(response).await;
    assert!(html.contains("An error occurred while processing your request."));
    assert!(html.contains("handler exploded"));
}

#[tokio::test]
async fn panic_details_hidden_in_production() {
    let response = get(build_panicking_app(Environment::Production), "/boom").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let html = body_text(response).await;
    assert!(!html.contains("handler exploded"));
}
