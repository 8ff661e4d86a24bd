//! Integration tests against a live router on an ephemeral port

mod api_tests;

use bookshelf_server::{api, AppConfig, AppState};

/// Serve a fresh, empty application and return its base URL
pub async fn spawn_app() -> String {
    let app = api::create_router(AppState::new(&AppConfig::default()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("No local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });

    format!("http://{}", addr)
}
