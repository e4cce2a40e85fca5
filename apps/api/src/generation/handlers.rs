//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::generation::generator::{generate_sop, GenerateOptions, GenerationSource};
use crate::generation::template::DocumentStyle;
use crate::models::sop::ApplicantProfile;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// The caller's draft: questionnaire answers plus generation options.
#[derive(Debug, Deserialize)]
pub struct GenerateSopRequest {
    #[serde(flatten)]
    pub profile: ApplicantProfile,
    #[serde(default)]
    pub style: DocumentStyle,
    #[serde(default)]
    pub offline: bool,
}

#[derive(Debug, Serialize)]
pub struct GenerateSopResponse {
    pub success: bool,
    pub sop: String,
    pub source: GenerationSource,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate-sop
///
/// Anonymous. Tries the LLM once, falls back to the template generator.
/// Always answers `success: true`; `source` tells which path was taken.
pub async fn handle_generate_sop(
    State(state): State<AppState>,
    Json(request): Json<GenerateSopRequest>,
) -> Json<GenerateSopResponse> {
    let options = GenerateOptions {
        style: request.style,
        offline: request.offline,
    };
    let generated = generate_sop(&state.llm, &request.profile, options).await;

    Json(GenerateSopResponse {
        success: true,
        sop: generated.text,
        source: generated.source,
    })
}
