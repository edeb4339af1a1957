//! Page route handler.
//!
//! Serves the embedded single-page UI: upload, preview, map and result panel.

use axum::response::{Html, IntoResponse};

const INDEX_HTML: &str = include_str!("../../../../assets/web/index.html");

/// GET / - Serve the UI.
pub async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}
