use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::modules::teachers::model::{CreateTeacherDto, Teacher, UpdateTeacherDto};
use crate::utils::errors::AppError;

pub struct TeacherService;

impl TeacherService {
    #[instrument(skip(db, dto), fields(school.id = %school_id))]
    pub async fn create_teacher(
        db: &PgPool,
        school_id: Uuid,
        dto: CreateTeacherDto,
    ) -> Result<Teacher, AppError> {
        let name = dto.name.trim();
        if name.is_empty() {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Teacher name must not be empty"
            )));
        }

        let teacher = sqlx::query_as::<_, Teacher>(
            "INSERT INTO teachers (name, school_id)
             VALUES ($1, $2)
             RETURNING id, name, school_id, created_at, updated_at",
        )
        .bind(name)
        .bind(school_id)
        .fetch_one(db)
        .await?;

        info!(teacher.id = %teacher.id, school.id = %school_id, "Teacher created");

        Ok(teacher)
    }

    #[instrument(skip(db), fields(school.id = %school_id))]
    pub async fn get_teachers_by_school(
        db: &PgPool,
        school_id: Uuid,
    ) -> Result<Vec<Teacher>, AppError> {
        let teachers = sqlx::query_as::<_, Teacher>(
            "SELECT id, name, school_id, created_at, updated_at
             FROM teachers
             WHERE school_id = $1
             ORDER BY name",
        )
        .bind(school_id)
        .fetch_all(db)
        .await?;

        Ok(teachers)
    }

    #[instrument(skip(db), fields(school.id = %school_id))]
    pub async fn get_teacher_by_id(
        db: &PgPool,
        teacher_id: Uuid,
        school_id: Uuid,
    ) -> Result<Teacher, AppError> {
        let teacher = sqlx::query_as::<_, Teacher>(
            "SELECT id, name, school_id, created_at, updated_at
             FROM teachers
             WHERE id = $1 AND school_id = $2",
        )
        .bind(teacher_id)
        .bind(school_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher not found")))?;

        Ok(teacher)
    }

    #[instrument(skip(db, dto), fields(school.id = %school_id))]
    pub async fn update_teacher(
        db: &PgPool,
        teacher_id: Uuid,
        school_id: Uuid,
        dto: UpdateTeacherDto,
    ) -> Result<Teacher, AppError> {
        let name = dto.name.trim();
        if name.is_empty() {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Teacher name must not be empty"
            )));
        }

        let teacher = sqlx::query_as::<_, Teacher>(
            "UPDATE teachers
             SET name = $1, updated_at = NOW()
             WHERE id = $2 AND school_id = $3
             RETURNING id, name, school_id, created_at, updated_at",
        )
        .bind(name)
        .bind(teacher_id)
        .bind(school_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher not found")))?;

        Ok(teacher)
    }

    /// Delete a teacher, refusing while any leave record still references it.
    /// The guard keeps history intact instead of cascading.
    #[instrument(skip(db), fields(school.id = %school_id))]
    pub async fn delete_teacher(
        db: &PgPool,
        teacher_id: Uuid,
        school_id: Uuid,
    ) -> Result<(), AppError> {
        // Resolve within the tenant first, so a foreign id reads as missing
        // rather than leaking the conflict state of another school's row.
        Self::get_teacher_by_id(db, teacher_id, school_id).await?;

        let has_leave = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM leave_records WHERE teacher_id = $1 AND school_id = $2)",
        )
        .bind(teacher_id)
        .bind(school_id)
        .fetch_one(db)
        .await?;

        if has_leave {
            return Err(AppError::conflict(anyhow::anyhow!(
                "Cannot delete a teacher with recorded leave"
            )));
        }

        let result = sqlx::query("DELETE FROM teachers WHERE id = $1 AND school_id = $2")
            .bind(teacher_id)
            .bind(school_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Teacher not found")));
        }

        info!(teacher.id = %teacher_id, school.id = %school_id, "Teacher deleted");

        Ok(())
    }
}
