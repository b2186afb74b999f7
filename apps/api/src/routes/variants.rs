use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::resume::SectionKey;
use crate::models::variant::{SectionSetting, Variant, VariantOverride, VariantRule};
use crate::state::AppState;
use crate::store::Document;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub rules: Vec<VariantRule>,
    #[serde(default)]
    pub overrides: Vec<VariantOverride>,
    #[serde(default)]
    pub section_settings: IndexMap<SectionKey, SectionSetting>,
    #[serde(default)]
    pub template_id: Option<String>,
}

impl VariantInput {
    fn apply_to(self, variant: &mut Variant) -> Result<(), AppError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Variant name must not be empty".to_string()));
        }
        variant.name = name.to_string();
        variant.description = self.description;
        variant.rules = self.rules;
        variant.overrides = self.overrides;
        variant.section_settings = self.section_settings;
        variant.template_id = self.template_id;
        variant.touch();
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DuplicateRequest {
    #[serde(default)]
    pub name: Option<String>,
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Variant {id} not found"))
}

/// GET /api/v1/variants
pub async fn handle_list(State(state): State<AppState>) -> Result<Json<Vec<Variant>>, AppError> {
    Ok(Json(state.store.load().await?.variants))
}

/// POST /api/v1/variants
pub async fn handle_create(
    State(state): State<AppState>,
    AppJson(input): AppJson<VariantInput>,
) -> Result<(StatusCode, Json<Variant>), AppError> {
    let mut variant = Variant::new("");
    input.apply_to(&mut variant)?;

    let _guard = state.writer.lock().await;
    let mut variants = state.store.load().await?.variants;
    variants.push(variant.clone());
    state.store.save(Document::Variants(variants)).await?;
    info!("Created variant '{}' ({})", variant.name, variant.id);
    Ok((StatusCode::CREATED, Json(variant)))
}

/// GET /api/v1/variants/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Variant>, AppError> {
    let docs = state.store.load().await?;
    let variant = docs.find_variant(Some(&id)).ok_or_else(|| not_found(&id))?;
    Ok(Json(variant.clone()))
}

/// PUT /api/v1/variants/:id
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<VariantInput>,
) -> Result<Json<Variant>, AppError> {
    let _guard = state.writer.lock().await;
    let mut variants = state.store.load().await?.variants;
    let variant = variants
        .iter_mut()
        .find(|v| v.id == id)
        .ok_or_else(|| not_found(&id))?;
    input.apply_to(variant)?;
    let updated = variant.clone();
    state.store.save(Document::Variants(variants)).await?;
    Ok(Json(updated))
}

/// DELETE /api/v1/variants/:id
///
/// Job applications and cover letters that reference the variant are left as is.
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let _guard = state.writer.lock().await;
    let mut variants = state.store.load().await?.variants;
    let before = variants.len();
    variants.retain(|v| v.id != id);
    if variants.len() == before {
        return Err(not_found(&id));
    }
    state.store.save(Document::Variants(variants)).await?;
    info!("Deleted variant {id}");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/variants/:id/duplicate
pub async fn handle_duplicate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<AppJson<DuplicateRequest>>,
) -> Result<(StatusCode, Json<Variant>), AppError> {
    let request = body.map(|AppJson(r)| r).unwrap_or_default();

    let _guard = state.writer.lock().await;
    let mut variants = state.store.load().await?.variants;
    let source = variants
        .iter()
        .find(|v| v.id == id)
        .ok_or_else(|| not_found(&id))?;
    let name = request
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| format!("{} (copy)", source.name));
    let copy = source.duplicate(name);
    variants.push(copy.clone());
    state.store.save(Document::Variants(variants)).await?;
    Ok((StatusCode::CREATED, Json(copy)))
}

/// POST /api/v1/variants/:id/overrides
///
/// Records a single override edit the way an editor would: a `set` replaces an
/// earlier `set` on the same path.
pub async fn handle_add_override(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(edit): AppJson<VariantOverride>,
) -> Result<Json<Variant>, AppError> {
    let _guard = state.writer.lock().await;
    let mut variants = state.store.load().await?.variants;
    let variant = variants
        .iter_mut()
        .find(|v| v.id == id)
        .ok_or_else(|| not_found(&id))?;
    variant.upsert_override(edit);
    variant.touch();
    let updated = variant.clone();
    state.store.save(Document::Variants(variants)).await?;
    Ok(Json(updated))
}
