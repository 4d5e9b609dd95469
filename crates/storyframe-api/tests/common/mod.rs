//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use storyframe_core::config::PipelineConfig;
use storyframe_core::enrichment::{Enricher, TemplateEnricher};
use tower::ServiceExt;

use storyframe_api::routes;
use storyframe_api::state::AppState;

/// Build the full app router with the deterministic template enricher.
/// Uses the same route structure as `main.rs`.
pub fn build_test_app() -> Router {
    build_test_app_with_enricher(Arc::new(TemplateEnricher))
}

/// Build the full app router with a custom enricher.
pub fn build_test_app_with_enricher(enricher: Arc<dyn Enricher>) -> Router {
    let app_state = AppState::new(enricher, PipelineConfig::default());

    Router::new()
        .merge(routes::health::router())
        .merge(routes::storyboard::router())
        .with_state(app_state)
}

/// A valid request body with the given script.
pub fn storyboard_body(script: &str) -> serde_json::Value {
    serde_json::json!({
        "title": "Homecoming",
        "script": script,
        "scriptLanguage": "en",
        "visualStyle": "realistic",
        "tone": "dramatic",
        "shotPreference": "balanced"
    })
}

/// Send a POST request with a JSON body and return the status and raw body.
pub async fn post_raw(app: Router, uri: &str, body: &serde_json::Value) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();

    (status, body_bytes.to_vec())
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let (status, bytes) = post_raw(app, uri, body).await;
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
