use axum::extract::State;
use axum::Json;
use serde_json::Value;

use crate::api::{failure, ApiError};
use crate::models::{CatalogStatus, ImportResponse};
use crate::state::AppState;

/// GET /api/catalog - Size and load time of the live snapshot
pub async fn status(State(state): State<AppState>) -> Json<CatalogStatus> {
    let snapshot = state.catalog.snapshot();
    Json(CatalogStatus {
        courses: snapshot.len(),
        loaded_at: snapshot.loaded_at(),
    })
}

/// POST /api/catalog/reload - Rebuild records, chunks and the primary index
pub async fn reload(State(state): State<AppState>) -> Result<Json<CatalogStatus>, ApiError> {
    state.catalog.reload().await.map_err(failure)?;
    Ok(status(State(state)).await)
}

/// POST /api/catalog/courses - Insert raw course documents (duplicates by name
/// are skipped), then reload so they become searchable
pub async fn import(
    State(state): State<AppState>,
    Json(documents): Json<Vec<Value>>,
) -> Result<Json<ImportResponse>, ApiError> {
    let report = state
        .catalog
        .store()
        .insert(documents)
        .await
        .map_err(failure)?;
    let courses = state.catalog.reload().await.map_err(failure)?;

    Ok(Json(ImportResponse {
        inserted: report.inserted,
        skipped: report.skipped,
        courses,
    }))
}
