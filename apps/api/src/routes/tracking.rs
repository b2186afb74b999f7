use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::tracking::{CoverLetter, CoverLetterInput, JobApplication, JobApplicationInput};
use crate::state::AppState;
use crate::store::Document;

fn require(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("'{field}' must not be empty")));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Job applications
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobApplication>>, AppError> {
    Ok(Json(state.store.load().await?.jobs))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    AppJson(input): AppJson<JobApplicationInput>,
) -> Result<(StatusCode, Json<JobApplication>), AppError> {
    require(&input.company, "company")?;
    require(&input.position, "position")?;

    let job = JobApplication::create(input);
    let _guard = state.writer.lock().await;
    let mut jobs = state.store.load().await?.jobs;
    jobs.push(job.clone());
    state.store.save(Document::JobApplications(jobs)).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// PUT /api/v1/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<JobApplicationInput>,
) -> Result<Json<JobApplication>, AppError> {
    require(&input.company, "company")?;
    require(&input.position, "position")?;

    let _guard = state.writer.lock().await;
    let mut jobs = state.store.load().await?.jobs;
    let job = jobs
        .iter_mut()
        .find(|j| j.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Job application {id} not found")))?;
    job.apply(input);
    let updated = job.clone();
    state.store.save(Document::JobApplications(jobs)).await?;
    Ok(Json(updated))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let _guard = state.writer.lock().await;
    let mut jobs = state.store.load().await?.jobs;
    let before = jobs.len();
    jobs.retain(|j| j.id != id);
    if jobs.len() == before {
        return Err(AppError::NotFound(format!("Job application {id} not found")));
    }
    state.store.save(Document::JobApplications(jobs)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Cover letters
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/cover-letters
pub async fn handle_list_letters(
    State(state): State<AppState>,
) -> Result<Json<Vec<CoverLetter>>, AppError> {
    Ok(Json(state.store.load().await?.cover_letters))
}

/// POST /api/v1/cover-letters
pub async fn handle_create_letter(
    State(state): State<AppState>,
    AppJson(input): AppJson<CoverLetterInput>,
) -> Result<(StatusCode, Json<CoverLetter>), AppError> {
    require(&input.title, "title")?;

    let letter = CoverLetter::create(input);
    let _guard = state.writer.lock().await;
    let mut letters = state.store.load().await?.cover_letters;
    letters.push(letter.clone());
    state.store.save(Document::CoverLetters(letters)).await?;
    Ok((StatusCode::CREATED, Json(letter)))
}

/// PUT /api/v1/cover-letters/:id
pub async fn handle_update_letter(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<CoverLetterInput>,
) -> Result<Json<CoverLetter>, AppError> {
    require(&input.title, "title")?;

    let _guard = state.writer.lock().await;
    let mut letters = state.store.load().await?.cover_letters;
    let letter = letters
        .iter_mut()
        .find(|l| l.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Cover letter {id} not found")))?;
    letter.apply(input);
    let updated = letter.clone();
    state.store.save(Document::CoverLetters(letters)).await?;
    Ok(Json(updated))
}

/// DELETE /api/v1/cover-letters/:id
pub async fn handle_delete_letter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let _guard = state.writer.lock().await;
    let mut letters = state.store.load().await?.cover_letters;
    let before = letters.len();
    letters.retain(|l| l.id != id);
    if letters.len() == before {
        return Err(AppError::NotFound(format!("Cover letter {id} not found")));
    }
    state.store.save(Document::CoverLetters(letters)).await?;
    Ok(StatusCode::NO_CONTENT)
}
