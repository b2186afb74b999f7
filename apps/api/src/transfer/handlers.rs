use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderName},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::resume::{ResumeMaster, SectionKey};
use crate::state::AppState;
use crate::store::Document;
use crate::transfer::{
    clear_section_data, export_section, import_single_section, ImportMode, SectionExportData,
};

#[derive(Deserialize)]
pub struct ImportQuery {
    #[serde(default)]
    pub mode: ImportMode,
}

fn section_key(raw: &str) -> Result<SectionKey, AppError> {
    raw.parse::<SectionKey>().map_err(AppError::Validation)
}

/// GET /api/v1/master/sections/:section/export
pub async fn handle_export(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Result<([(HeaderName, String); 1], Json<SectionExportData>), AppError> {
    let key = section_key(&section)?;
    let docs = state.store.load().await?;
    let export = export_section(&docs.master, key)?;
    let disposition = format!("attachment; filename=\"{}\"", export.file_name());
    Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(export)))
}

/// POST /api/v1/master/sections/:section/import?mode=merge|replace
pub async fn handle_import(
    State(state): State<AppState>,
    Path(section): Path<String>,
    Query(params): Query<ImportQuery>,
    AppJson(raw): AppJson<Value>,
) -> Result<Json<ResumeMaster>, AppError> {
    let key = section_key(&section)?;

    let _guard = state.writer.lock().await;
    let docs = state.store.load().await?;
    let updated = import_single_section(&docs.master, &raw, key, params.mode)?;
    state.store.save(Document::Master(updated.clone())).await?;
    Ok(Json(updated))
}

/// DELETE /api/v1/master/sections/:section
pub async fn handle_clear(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Result<Json<ResumeMaster>, AppError> {
    let key = section_key(&section)?;

    let _guard = state.writer.lock().await;
    let docs = state.store.load().await?;
    let updated = clear_section_data(&docs.master, key);
    state.store.save(Document::Master(updated.clone())).await?;
    Ok(Json(updated))
}
