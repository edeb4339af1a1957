//! Geosight Web Server
//!
//! Axum-based web server for the upload page and the session API.

pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use geosight_core::LocationAnalyzer;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/session", get(routes::session::get_session))
        .route("/image", post(routes::session::upload_image))
        .route("/analyze", post(routes::session::analyze))
        .route("/reset", post(routes::session::reset))
        .with_state(state.clone());

    Router::new()
        .route("/", get(routes::page::index))
        .nest("/api", api_routes)
        // Images are forwarded as-is, whatever their size.
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the web server.
pub async fn run_server(analyzer: Arc<dyn LocationAnalyzer>, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(analyzer);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("Web server listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}
