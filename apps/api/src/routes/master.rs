use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::resume::ResumeMaster;
use crate::state::AppState;
use crate::store::Document;
use crate::transfer::validation::validate_master_records;

/// GET /api/v1/master
pub async fn handle_get_master(
    State(state): State<AppState>,
) -> Result<Json<ResumeMaster>, AppError> {
    Ok(Json(state.store.load().await?.master))
}

/// PUT /api/v1/master
pub async fn handle_put_master(
    State(state): State<AppState>,
    AppJson(mut master): AppJson<ResumeMaster>,
) -> Result<Json<ResumeMaster>, AppError> {
    let errors = validate_master_records(&master);
    if !errors.is_empty() {
        return Err(AppError::ImportRejected(errors));
    }

    let _guard = state.writer.lock().await;
    let current = state.store.load().await?.master;
    // The master is a singleton; its identity and creation time are fixed.
    master.id = current.id;
    master.created_at = current.created_at;
    master.touch();
    state.store.save(Document::Master(master.clone())).await?;
    Ok(Json(master))
}
