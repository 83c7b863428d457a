use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cundatabs_core::{SavedTab, TabData};

use crate::dto::{DeleteResponse, SaveResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Stores a tablature. The body is parsed here rather than with `Json` so
/// any malformed payload gets the same 400 body.
pub async fn save_tab(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SaveResponse>, AppError> {
    let tab: TabData = serde_json::from_slice(&body)
        .map_err(|_| AppError::BadRequest("Invalid JSON".to_string()))?;

    let filename = state.store.save(&tab, state.clock.now())?;
    tracing::info!("Saved tab \"{}\" as {filename}", tab.name);

    Ok(Json(SaveResponse {
        success: true,
        filename,
    }))
}

pub async fn list_tabs(State(state): State<AppState>) -> Json<Vec<SavedTab>> {
    Json(state.store.list())
}

/// Returns the stored JSON verbatim.
pub async fn load_tab(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    let content = state.store.load(&name)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], content).into_response())
}

pub async fn delete_tab(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    state.store.delete(&name)?;
    tracing::info!("Deleted tab {name}");
    Ok(Json(DeleteResponse { success: true }))
}
