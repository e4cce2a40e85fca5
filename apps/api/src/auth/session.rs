//! Session tokens: HS256 JWTs carrying a stable user id in `sub`.
//!
//! The only thing document handlers need from identity is [`AuthUser`]:
//! a request either resolves to one user id or is rejected as unauthorized
//! before the handler body (and therefore storage) runs.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::state::AppState;

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Stable user id.
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl SessionKeys {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    pub fn issue(&self, user_id: &str, email: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now,
            exp: now + self.ttl_secs,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Rejects tokens that are malformed, expired, or signed with another secret.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding_key, &self.validation).map(|data| data.claims)
    }
}

/// The authenticated caller, resolved from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Unauthorized)?;

        let claims = state.sessions.verify(token).map_err(|e| {
            debug!("Rejected session token: {e}");
            AppError::Unauthorized
        })?;

        if claims.sub.trim().is_empty() {
            return Err(AppError::Unauthorized);
        }

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}
