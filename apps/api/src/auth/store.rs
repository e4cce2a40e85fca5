use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRow;

/// User record storage. Emails are stored normalized (see [`normalize_email`]).
///
/// Carried in `AppState` as `Arc<dyn UserStore>`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates a password user. `AppError::Conflict` if the email is taken.
    async fn create(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
    ) -> Result<UserRow, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, AppError>;

    /// Federated sign-in: returns the user for `email`, creating one without a
    /// password on first sign-in. The returned id is stable across sign-ins.
    ///
    /// Called by the external OAuth front end, not by any route here.
    #[allow(dead_code)]
    async fn find_or_provision(&self, email: &str, name: Option<&str>)
        -> Result<UserRow, AppError>;
}

/// Lowercases and trims an email so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn new_user_id() -> String {
    Uuid::new_v4().to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
    ) -> Result<UserRow, AppError> {
        let result = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(new_user_id())
        .bind(normalize_email(email))
        .bind(name)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => {
                info!("Registered user {}", user.id);
                Ok(user)
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(
                AppError::Conflict("An account with this email already exists".to_string()),
            ),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, AppError> {
        Ok(
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
                .bind(normalize_email(email))
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_or_provision(
        &self,
        email: &str,
        name: Option<&str>,
    ) -> Result<UserRow, AppError> {
        let email = normalize_email(email);

        let inserted = sqlx::query(
            "INSERT INTO users (id, email, name) VALUES ($1, $2, $3) ON CONFLICT (email) DO NOTHING",
        )
        .bind(new_user_id())
        .bind(&email)
        .bind(name)
        .execute(&self.pool)
        .await?;

        if inserted.rows_affected() > 0 {
            info!("Provisioned federated user for first sign-in");
        }

        Ok(
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
                .bind(&email)
                .fetch_one(&self.pool)
                .await?,
        )
    }
}
