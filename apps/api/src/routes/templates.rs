use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::models::template::Template;
use crate::state::AppState;

/// GET /api/v1/templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
) -> Result<Json<Vec<Template>>, AppError> {
    Ok(Json(state.store.load().await?.templates))
}
