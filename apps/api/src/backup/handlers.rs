use axum::{
    extract::State,
    http::{header, HeaderName},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::backup::{create_backup, restore_backup, BackupBundle};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreResponse {
    pub version: String,
    pub restored: Vec<&'static str>,
}

/// GET /api/v1/backup
pub async fn handle_backup(
    State(state): State<AppState>,
) -> Result<([(HeaderName, String); 1], Json<BackupBundle>), AppError> {
    let docs = state.store.load().await?;
    let bundle = create_backup(&docs)?;
    let disposition = format!(
        "attachment; filename=\"resume-backup-{}.json\"",
        Utc::now().format("%Y-%m-%d")
    );
    Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(bundle)))
}

/// POST /api/v1/backup/restore
pub async fn handle_restore(
    State(state): State<AppState>,
    AppJson(bundle): AppJson<BackupBundle>,
) -> Result<Json<RestoreResponse>, AppError> {
    // Everything is decoded before the first write.
    let restored = restore_backup(&bundle)?;
    let version = restored.metadata.version.clone();
    let documents = restored.into_documents();
    let kinds: Vec<&'static str> = documents.iter().map(|d| d.kind().key()).collect();

    let _guard = state.writer.lock().await;
    state.store.save_all(documents).await?;
    info!("Restored backup v{version}: {}", kinds.join(", "));

    Ok(Json(RestoreResponse {
        version,
        restored: kinds,
    }))
}
