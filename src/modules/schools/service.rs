use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::modules::schools::model::School;
use crate::utils::errors::AppError;

pub struct SchoolService;

impl SchoolService {
    /// Look a school up by name, creating it when it does not exist yet.
    /// Registration funnels through here so two accounts naming the same
    /// school end up in the same tenant instead of duplicating it.
    #[instrument(skip(db))]
    pub async fn find_or_create(db: &PgPool, name: &str) -> Result<School, AppError> {
        if let Some(school) = sqlx::query_as::<_, School>(
            "SELECT id, name, created_at, updated_at FROM schools WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(db)
        .await?
        {
            return Ok(school);
        }

        let inserted = sqlx::query_as::<_, School>(
            "INSERT INTO schools (name) VALUES ($1)
             ON CONFLICT (name) DO NOTHING
             RETURNING id, name, created_at, updated_at",
        )
        .bind(name)
        .fetch_optional(db)
        .await?;

        if let Some(school) = inserted {
            info!(school.id = %school.id, school.name = %school.name, "School created");
            return Ok(school);
        }

        // A concurrent registration inserted the same name first.
        let school = sqlx::query_as::<_, School>(
            "SELECT id, name, created_at, updated_at FROM schools WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::internal(anyhow::anyhow!("School lookup failed after insert")))?;

        Ok(school)
    }

    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, school_id: Uuid) -> Result<School, AppError> {
        let school = sqlx::query_as::<_, School>(
            "SELECT id, name, created_at, updated_at FROM schools WHERE id = $1",
        )
        .bind(school_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("School not found")))?;

        Ok(school)
    }
}
