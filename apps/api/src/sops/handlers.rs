//! Axum route handlers for stored Statements of Purpose.
//!
//! Every handler takes `AuthUser` first: an unauthenticated request is rejected
//! before any storage call. Cross-user access answers 404, never 403.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::session::AuthUser;
use crate::errors::AppError;
use crate::generation::generator::{generate_sop, GenerateOptions, GenerationSource};
use crate::generation::template::DocumentStyle;
use crate::models::sop::{NewSop, SopRow, SopUpdate};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSopResponse {
    pub message: String,
    pub sop_id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegenerateRequest {
    #[serde(default)]
    pub style: DocumentStyle,
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("SOP {id} not found"))
}

/// A malformed id cannot name an owned document, so it is a 404 as well.
fn parse_sop_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| not_found(raw))
}

/// An empty body means the default style. Anything else must parse, so a bad
/// request never overwrites the stored text.
fn parse_regenerate_body(body: &[u8]) -> Result<RegenerateRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RegenerateRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid regenerate request: {e}")))
}

/// `SOP_<name>_<university>.txt` restricted to header-safe characters.
fn download_filename(sop: &SopRow) -> String {
    let clean = |s: &str| -> String {
        s.trim()
            .chars()
            .filter_map(|c| match c {
                c if c.is_ascii_alphanumeric() || matches!(c, '-' | '.') => Some(c),
                c if c.is_whitespace() || c == '_' => Some('_'),
                _ => None,
            })
            .collect()
    };
    format!(
        "SOP_{}_{}.txt",
        clean(&sop.profile.full_name),
        clean(&sop.profile.target_university)
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/sop
pub async fn handle_create_sop(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<NewSop>,
) -> Result<(StatusCode, Json<CreateSopResponse>), AppError> {
    let missing = request.profile.missing_required_fields();
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let row = state.sops.insert(&auth.user_id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateSopResponse {
            message: "SOP saved successfully".to_string(),
            sop_id: row.id,
        }),
    ))
}

/// GET /api/sop
pub async fn handle_list_sops(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<SopRow>>, AppError> {
    let sops = state.sops.list_owned(&auth.user_id).await?;
    info!("Found {} SOPs for user {}", sops.len(), auth.user_id);
    Ok(Json(sops))
}

/// GET /api/sop/:id
pub async fn handle_get_sop(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<SopRow>, AppError> {
    let id = parse_sop_id(&raw_id)?;
    state
        .sops
        .find_owned(&auth.user_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(&raw_id))
}

/// PUT /api/sop/:id
pub async fn handle_update_sop(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(update): Json<SopUpdate>,
) -> Result<Json<SopRow>, AppError> {
    let id = parse_sop_id(&raw_id)?;
    state
        .sops
        .update_owned(&auth.user_id, id, update)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(&raw_id))
}

/// GET /api/sop/:id/download
///
/// The generated text as a plain-text attachment.
pub async fn handle_download_sop(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_sop_id(&raw_id)?;
    let sop = state
        .sops
        .find_owned(&auth.user_id, id)
        .await?
        .ok_or_else(|| not_found(&raw_id))?;

    let disposition = format!("attachment; filename=\"{}\"", download_filename(&sop));
    let body = sop.generated_sop.unwrap_or_default();

    Ok((
        [
            (CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// POST /api/sop/:id/regenerate
///
/// Re-runs generation from the stored profile and replaces the text body.
pub async fn handle_regenerate_sop(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<SopRow>, AppError> {
    let id = parse_sop_id(&raw_id)?;
    let request = parse_regenerate_body(&body)?;

    let existing = state
        .sops
        .find_owned(&auth.user_id, id)
        .await?
        .ok_or_else(|| not_found(&raw_id))?;

    let options = GenerateOptions {
        style: request.style,
        offline: false,
    };
    let generated = generate_sop(&state.llm, &existing.profile, options).await;

    let sop = state
        .sops
        .update_owned(
            &auth.user_id,
            id,
            SopUpdate::with_generated_sop(generated.text),
        )
        .await?
        .ok_or_else(|| not_found(&raw_id))?;

    let via = match generated.source {
        GenerationSource::Ai => "LLM",
        GenerationSource::Template => "template",
    };
    info!("Regenerated SOP {} via {via}", sop.id);
    Ok(Json(sop))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sop::ApplicantProfile;
    use chrono::Utc;

    #[test]
    fn test_download_filename_is_header_safe() {
        let now = Utc::now();
        let sop = SopRow {
            id: Uuid::new_v4(),
            user_id: "u".to_string(),
            profile: ApplicantProfile {
                full_name: "Jane \"JD\" Doe".to_string(),
                target_university: "Université de Acme".to_string(),
                ..Default::default()
            },
            generated_sop: None,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(download_filename(&sop), "SOP_Jane_JD_Doe_Universit_de_Acme.txt");
    }

    #[test]
    fn test_regenerate_body_parsing() {
        assert_eq!(parse_regenerate_body(b"").unwrap().style, DocumentStyle::Formal);
        assert_eq!(parse_regenerate_body(b" \n").unwrap().style, DocumentStyle::Formal);
        assert_eq!(
            parse_regenerate_body(br#"{"style":"technical"}"#).unwrap().style,
            DocumentStyle::Technical
        );
        assert!(matches!(
            parse_regenerate_body(br#"{"style":"pirate"}"#),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            parse_regenerate_body(b"{not json"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_malformed_id_is_not_found() {
        assert!(matches!(
            parse_sop_id("not-a-uuid"),
            Err(AppError::NotFound(_))
        ));
    }
}
