pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::generation::handlers as generation;
use crate::sops::handlers as sops;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Identity
        .route("/api/auth/register", post(auth::handle_register))
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/session", get(auth::handle_session))
        // Generation (anonymous)
        .route("/api/generate-sop", post(generation::handle_generate_sop))
        // Stored documents (owner-scoped)
        .route(
            "/api/sop",
            post(sops::handle_create_sop).get(sops::handle_list_sops),
        )
        .route(
            "/api/sop/:id",
            get(sops::handle_get_sop).put(sops::handle_update_sop),
        )
        .route("/api/sop/:id/download", get(sops::handle_download_sop))
        .route(
            "/api/sop/:id/regenerate",
            post(sops::handle_regenerate_sop),
        )
        .with_state(state)
}
