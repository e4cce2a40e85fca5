use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user known to the credential provider.
///
/// `id` is a string so ids minted by other identity providers fit unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    /// argon2id PHC string. Absent for federated users.
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}
