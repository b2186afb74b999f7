pub mod health;
pub mod master;
pub mod templates;
pub mod tracking;
pub mod variants;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::backup::handlers as backup;
use crate::resolution::handlers as resolution;
use crate::state::AppState;
use crate::transfer::handlers as transfer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Master resume
        .route(
            "/api/v1/master",
            get(master::handle_get_master).put(master::handle_put_master),
        )
        .route(
            "/api/v1/master/resolved",
            get(resolution::handle_master_resolved),
        )
        .route(
            "/api/v1/master/sections/:section",
            delete(transfer::handle_clear),
        )
        .route(
            "/api/v1/master/sections/:section/export",
            get(transfer::handle_export),
        )
        .route(
            "/api/v1/master/sections/:section/import",
            post(transfer::handle_import),
        )
        // Variants
        .route(
            "/api/v1/variants",
            get(variants::handle_list).post(variants::handle_create),
        )
        .route(
            "/api/v1/variants/:id",
            get(variants::handle_get)
                .put(variants::handle_update)
                .delete(variants::handle_delete),
        )
        .route(
            "/api/v1/variants/:id/duplicate",
            post(variants::handle_duplicate),
        )
        .route(
            "/api/v1/variants/:id/overrides",
            post(variants::handle_add_override),
        )
        .route(
            "/api/v1/variants/:id/resolved",
            get(resolution::handle_variant_resolved),
        )
        // Tracking
        .route(
            "/api/v1/jobs",
            get(tracking::handle_list_jobs).post(tracking::handle_create_job),
        )
        .route(
            "/api/v1/jobs/:id",
            put(tracking::handle_update_job).delete(tracking::handle_delete_job),
        )
        .route("/api/v1/jobs/:id/resume", get(resolution::handle_job_resume))
        .route(
            "/api/v1/cover-letters",
            get(tracking::handle_list_letters).post(tracking::handle_create_letter),
        )
        .route(
            "/api/v1/cover-letters/:id",
            put(tracking::handle_update_letter).delete(tracking::handle_delete_letter),
        )
        .route(
            "/api/v1/templates",
            get(templates::handle_list_templates),
        )
        // Backup
        .route("/api/v1/backup", get(backup::handle_backup))
        .route("/api/v1/backup/restore", post(backup::handle_restore))
        .with_state(state)
}
