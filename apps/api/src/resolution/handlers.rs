use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;
use crate::models::template::{find_template, Template};
use crate::resolution::{resolve, ResolvedResume};
use crate::state::AppState;

/// A resolved resume plus the template its variant points at, if that template still exists.
#[derive(Serialize)]
pub struct ResolvedView {
    #[serde(flatten)]
    pub resume: ResolvedResume,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<Template>,
}

fn view(resume: ResolvedResume, templates: &[Template]) -> ResolvedView {
    let template_id = resume.variant.as_ref().and_then(|v| v.template_id.as_deref());
    let template = find_template(templates, template_id).cloned();
    ResolvedView { resume, template }
}

/// GET /api/v1/master/resolved
pub async fn handle_master_resolved(
    State(state): State<AppState>,
) -> Result<Json<ResolvedView>, AppError> {
    let docs = state.store.load().await?;
    Ok(Json(view(resolve(&docs.master, None), &docs.templates)))
}

/// GET /api/v1/variants/:id/resolved
pub async fn handle_variant_resolved(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResolvedView>, AppError> {
    let docs = state.store.load().await?;
    let variant = docs
        .find_variant(Some(&id))
        .ok_or_else(|| AppError::NotFound(format!("Variant {id} not found")))?;
    Ok(Json(view(resolve(&docs.master, Some(variant)), &docs.templates)))
}

/// GET /api/v1/jobs/:id/resume
///
/// The resume sent with a job application. A variant that has since been
/// deleted falls back to the plain master view.
pub async fn handle_job_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResolvedView>, AppError> {
    let docs = state.store.load().await?;
    let job = docs
        .jobs
        .iter()
        .find(|j| j.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Job application {id} not found")))?;

    let variant = docs.find_variant(job.variant_id.as_deref());
    if variant.is_none() {
        if let Some(dangling) = &job.variant_id {
            debug!("Job {id} references missing variant {dangling}; using master");
        }
    }
    Ok(Json(view(resolve(&docs.master, variant), &docs.templates)))
}
