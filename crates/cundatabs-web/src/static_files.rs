use axum::http::StatusCode;
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::AssetsConfig;
use crate::state::AppState;

/// Editor page at `/` and its assets under `/static/`, read from disk.
pub fn router(assets: &AssetsConfig) -> Router<AppState> {
    Router::new()
        .route_service("/", ServeFile::new(assets.public_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(&assets.static_dir))
}

pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}
