use std::sync::Arc;

use crate::auth::session::SessionKeys;
use crate::auth::store::UserStore;
use crate::llm_client::LlmClient;
use crate::sops::store::SopStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Document storage. Postgres or in-memory, chosen via STORAGE_BACKEND.
    pub sops: Arc<dyn SopStore>,
    pub users: Arc<dyn UserStore>,
    pub llm: LlmClient,
    pub sessions: SessionKeys,
}
