use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use quizroom::dispatcher::Dispatcher;
use quizroom::quiz::builtin_questions;
use quizroom::registry::RoomStore;
use quizroom::shared::AppState;
use quizroom::websockets::{websocket_handler, InMemoryConnectionManager};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`
use tower_http::services::ServeDir;

fn test_app() -> Router {
    let connection_manager = Arc::new(InMemoryConnectionManager::new());
    let store = RoomStore::new(builtin_questions());
    let dispatcher = Dispatcher::new(store, connection_manager.clone()).spawn();
    let app_state = AppState::new(connection_manager, dispatcher);

    Router::new()
        .route("/ws", get(websocket_handler))
        .fallback_service(ServeDir::new("public").append_index_html_on_directories(true))
        .with_state(app_state)
}

#[tokio::test]
async fn test_site_root_serves_browser_client() {
    let app = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("Quizroom"));
}

#[tokio::test]
async fn test_non_upgrade_request_on_websocket_endpoint_is_rejected() {
    let app = test_app();

    // No upgradable connection behind this request, so the extractor
    // must turn it away instead of panicking
    let request = Request::builder()
        .method("GET")
        .uri("/ws")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}
