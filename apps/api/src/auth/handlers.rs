use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::AuthUser;
use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserRow,
    pub token: String,
    pub expires_in: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user_id: String,
    pub email: String,
}

fn issue_for(state: &AppState, user: UserRow) -> Result<AuthResponse, AppError> {
    let token = state
        .sessions
        .issue(&user.id, &user.email)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign session token: {e}")))?;
    Ok(AuthResponse {
        user,
        token,
        expires_in: state.sessions.ttl_secs(),
    })
}

/// Runs argon2 off the async executor.
async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password task failed: {e}")))
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let email = req.email.trim().to_string();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let password = req.password;
    let hash = blocking(move || hash_password(&password)).await??;

    let name = req.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
    let user = state.users.create(&email, name, &hash).await?;

    Ok((StatusCode::CREATED, Json(issue_for(&state, user)?)))
}

/// POST /api/auth/login
///
/// Unknown email and wrong password produce the same 401.
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let hash = user.password_hash.clone().ok_or(AppError::Unauthorized)?;
    let password = req.password;
    let valid = blocking(move || verify_password(&password, &hash)).await?;
    if !valid {
        return Err(AppError::Unauthorized);
    }

    info!("User {} signed in", user.id);
    Ok(Json(issue_for(&state, user)?))
}

/// GET /api/auth/session
pub async fn handle_session(auth: AuthUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        user_id: auth.user_id,
        email: auth.email,
    })
}
