mod status;
mod tabs;

use axum::http::{header, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::rate_limit::{delete_limit, general_limit, save_limit};
use crate::state::AppState;
use crate::static_files;

/// Builds the full application.
///
/// Every request passes the general limiter first, including static
/// files, unknown paths, oversized bodies and CORS preflights. `/save`
/// and `/delete/{name}` then pass their own tier.
pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    let save_routes = Router::new()
        .route("/save", post(tabs::save_tab))
        .route_layer(from_fn_with_state(state.clone(), save_limit));

    let delete_routes = Router::new()
        .route("/delete/{name}", delete(tabs::delete_tab))
        .route_layer(from_fn_with_state(state.clone(), delete_limit));

    // CORS: same-origin only by default (no cross-origin requests allowed)
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/tabs", get(tabs::list_tabs))
        .route("/load/{name}", get(tabs::load_tab))
        .route("/health", get(status::health))
        .route("/rate-limit-status", get(status::rate_limit_status))
        .merge(save_routes)
        .merge(delete_routes)
        .merge(static_files::router(&config.assets))
        .fallback(static_files::not_found)
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(cors)
        // Outside the body limit and CORS so rejected and preflight requests still count.
        .layer(from_fn_with_state(state.clone(), general_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
