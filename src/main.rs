use axum::{routing::get, Router};
use quizroom::dispatcher::Dispatcher;
use quizroom::quiz::builtin_questions;
use quizroom::registry::RoomStore;
use quizroom::shared::{self, AppState};
use quizroom::websockets::{self, InMemoryConnectionManager};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quizroom=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting quizroom trivia server");

    let connection_manager = Arc::new(InMemoryConnectionManager::new());

    // The dispatcher task is the sole owner of the room registry
    let store = RoomStore::new(builtin_questions());
    let dispatcher = Dispatcher::new(store, connection_manager.clone()).spawn();

    let app_state = AppState::new(connection_manager, dispatcher);

    // WebSocket endpoint plus the static browser client, with the site
    // root falling back to public/index.html
    let app = Router::new()
        .route("/ws", get(websockets::websocket_handler))
        .fallback_service(ServeDir::new("public").append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let port = shared::server_port();
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .expect("failed to bind listen port");
    info!(port = port, "Server running");
    axum::serve(listener, app).await.expect("server error");
}
