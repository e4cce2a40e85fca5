//! Document persistence. Every read and write is scoped by owner id; a row
//! owned by someone else is indistinguishable from a missing one.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::sop::{NewSop, SopRow, SopUpdate};

/// Carried in `AppState` as `Arc<dyn SopStore>`.
#[async_trait]
pub trait SopStore: Send + Sync {
    async fn insert(&self, owner_id: &str, new_sop: NewSop) -> Result<SopRow, AppError>;

    /// Newest first.
    async fn list_owned(&self, owner_id: &str) -> Result<Vec<SopRow>, AppError>;

    async fn find_owned(&self, owner_id: &str, id: Uuid) -> Result<Option<SopRow>, AppError>;

    /// Merges `update` and bumps `updated_at`. `None` if no owned row matched.
    async fn update_owned(
        &self,
        owner_id: &str,
        id: Uuid,
        update: SopUpdate,
    ) -> Result<Option<SopRow>, AppError>;
}

pub struct PgSopStore {
    pool: PgPool,
}

impl PgSopStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SopStore for PgSopStore {
    async fn insert(&self, owner_id: &str, new_sop: NewSop) -> Result<SopRow, AppError> {
        let NewSop {
            profile: p,
            generated_sop,
        } = new_sop;

        let row = sqlx::query_as::<_, SopRow>(
            r#"
            INSERT INTO sops
                (id, user_id, full_name, email, target_university, target_program,
                 current_education, gpa, work_experience, research_experience,
                 extracurricular_activities, achievements, skills, career_goals,
                 why_this_program, why_this_university, future_plans, generated_sop)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(p.full_name)
        .bind(p.email)
        .bind(p.target_university)
        .bind(p.target_program)
        .bind(p.current_education)
        .bind(p.gpa)
        .bind(p.work_experience)
        .bind(p.research_experience)
        .bind(p.extracurricular_activities)
        .bind(p.achievements)
        .bind(p.skills)
        .bind(p.career_goals)
        .bind(p.why_this_program)
        .bind(p.why_this_university)
        .bind(p.future_plans)
        .bind(generated_sop)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted SOP {} for user {}", row.id, owner_id);
        Ok(row)
    }

    async fn list_owned(&self, owner_id: &str) -> Result<Vec<SopRow>, AppError> {
        Ok(sqlx::query_as::<_, SopRow>(
            "SELECT * FROM sops WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_owned(&self, owner_id: &str, id: Uuid) -> Result<Option<SopRow>, AppError> {
        Ok(
            sqlx::query_as::<_, SopRow>("SELECT * FROM sops WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(owner_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn update_owned(
        &self,
        owner_id: &str,
        id: Uuid,
        update: SopUpdate,
    ) -> Result<Option<SopRow>, AppError> {
        // Single statement: absent fields keep their column value.
        let row = sqlx::query_as::<_, SopRow>(
            r#"
            UPDATE sops SET
                full_name                  = COALESCE($3, full_name),
                email                      = COALESCE($4, email),
                target_university          = COALESCE($5, target_university),
                target_program             = COALESCE($6, target_program),
                current_education          = COALESCE($7, current_education),
                gpa                        = COALESCE($8, gpa),
                work_experience            = COALESCE($9, work_experience),
                research_experience        = COALESCE($10, research_experience),
                extracurricular_activities = COALESCE($11, extracurricular_activities),
                achievements               = COALESCE($12, achievements),
                skills                     = COALESCE($13, skills),
                career_goals               = COALESCE($14, career_goals),
                why_this_program           = COALESCE($15, why_this_program),
                why_this_university        = COALESCE($16, why_this_university),
                future_plans               = COALESCE($17, future_plans),
                generated_sop              = COALESCE($18, generated_sop),
                updated_at                 = GREATEST(NOW(), created_at + INTERVAL '1 microsecond')
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(update.full_name)
        .bind(update.email)
        .bind(update.target_university)
        .bind(update.target_program)
        .bind(update.current_education)
        .bind(update.gpa)
        .bind(update.work_experience)
        .bind(update.research_experience)
        .bind(update.extracurricular_activities)
        .bind(update.achievements)
        .bind(update.skills)
        .bind(update.career_goals)
        .bind(update.why_this_program)
        .bind(update.why_this_university)
        .bind(update.future_plans)
        .bind(update.generated_sop)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = &row {
            info!("Updated SOP {} for user {}", row.id, owner_id);
        }
        Ok(row)
    }
}
