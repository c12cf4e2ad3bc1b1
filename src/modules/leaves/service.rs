use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::modules::leaves::model::{
    CreateLeaveDto, LeaveFilterParams, LeaveRecord, LeaveWithTeacher, PaginatedLeavesResponse,
    UpdateLeaveDto,
};
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

pub struct LeaveService;

impl LeaveService {
    async fn teacher_in_school(
        db: &PgPool,
        teacher_id: Uuid,
        school_id: Uuid,
    ) -> Result<(), AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM teachers WHERE id = $1 AND school_id = $2)",
        )
        .bind(teacher_id)
        .bind(school_id)
        .fetch_one(db)
        .await?;

        if !exists {
            return Err(AppError::not_found(anyhow::anyhow!("Teacher not found")));
        }

        Ok(())
    }

    fn check_date_range(start: chrono::NaiveDate, end: chrono::NaiveDate) -> Result<(), AppError> {
        if end < start {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "End date must not be earlier than start date"
            )));
        }
        Ok(())
    }

    /// Record a leave for a teacher of the caller's school. The recording
    /// account is stamped on the row.
    #[instrument(skip(db, dto), fields(school.id = %school_id))]
    pub async fn create_leave(
        db: &PgPool,
        school_id: Uuid,
        recorded_by: Uuid,
        dto: CreateLeaveDto,
    ) -> Result<LeaveRecord, AppError> {
        Self::teacher_in_school(db, dto.teacher_id, school_id).await?;
        Self::check_date_range(dto.start_date, dto.end_date)?;

        let note = dto.note.as_deref().unwrap_or("").trim().to_string();

        let leave = sqlx::query_as::<_, LeaveRecord>(
            "INSERT INTO leave_records (teacher_id, school_id, start_date, end_date, kind, note, approved_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, teacher_id, school_id, start_date, end_date, kind, note, approved_by,
                       created_at, updated_at",
        )
        .bind(dto.teacher_id)
        .bind(school_id)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .bind(dto.kind)
        .bind(&note)
        .bind(recorded_by)
        .fetch_one(db)
        .await?;

        info!(
            leave.id = %leave.id,
            teacher.id = %leave.teacher_id,
            school.id = %school_id,
            "Leave record created"
        );

        Ok(leave)
    }

    /// Leave records of the school, most recent start date first. Optionally
    /// narrowed to one teacher's history.
    #[instrument(skip(db, filters), fields(school.id = %school_id))]
    pub async fn get_leaves_by_school(
        db: &PgPool,
        school_id: Uuid,
        filters: LeaveFilterParams,
    ) -> Result<PaginatedLeavesResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let mut count_query =
            String::from("SELECT COUNT(*) FROM leave_records WHERE school_id = $1");
        if filters.teacher_id.is_some() {
            count_query.push_str(" AND teacher_id = $2");
        }

        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query).bind(school_id);
        if let Some(teacher_id) = filters.teacher_id {
            count_sql = count_sql.bind(teacher_id);
        }
        let total = count_sql.fetch_one(db).await?;

        let mut data_query = String::from(
            r#"SELECT
                l.id,
                l.teacher_id,
                t.name AS teacher_name,
                l.school_id,
                l.start_date,
                l.end_date,
                l.kind,
                l.note,
                l.approved_by,
                l.created_at,
                l.updated_at
               FROM leave_records l
               INNER JOIN teachers t ON t.id = l.teacher_id
               WHERE l.school_id = $1"#,
        );
        if filters.teacher_id.is_some() {
            data_query.push_str(" AND l.teacher_id = $2");
        }
        data_query.push_str(" ORDER BY l.start_date DESC");
        data_query.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));

        let mut data_sql = sqlx::query_as::<_, LeaveWithTeacher>(&data_query).bind(school_id);
        if let Some(teacher_id) = filters.teacher_id {
            data_sql = data_sql.bind(teacher_id);
        }
        let leaves = data_sql.fetch_all(db).await?;

        let has_more = offset + limit < total;

        Ok(PaginatedLeavesResponse {
            data: leaves,
            meta: PaginationMeta {
                total,
                limit,
                offset,
                has_more,
            },
        })
    }

    #[instrument(skip(db), fields(school.id = %school_id))]
    pub async fn get_leave_by_id(
        db: &PgPool,
        leave_id: Uuid,
        school_id: Uuid,
    ) -> Result<LeaveWithTeacher, AppError> {
        let leave = sqlx::query_as::<_, LeaveWithTeacher>(
            r#"SELECT
                l.id,
                l.teacher_id,
                t.name AS teacher_name,
                l.school_id,
                l.start_date,
                l.end_date,
                l.kind,
                l.note,
                l.approved_by,
                l.created_at,
                l.updated_at
               FROM leave_records l
               INNER JOIN teachers t ON t.id = l.teacher_id
               WHERE l.id = $1 AND l.school_id = $2"#,
        )
        .bind(leave_id)
        .bind(school_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Leave record not found")))?;

        Ok(leave)
    }

    #[instrument(skip(db, dto), fields(school.id = %school_id))]
    pub async fn update_leave(
        db: &PgPool,
        leave_id: Uuid,
        school_id: Uuid,
        recorded_by: Uuid,
        dto: UpdateLeaveDto,
    ) -> Result<LeaveRecord, AppError> {
        Self::teacher_in_school(db, dto.teacher_id, school_id).await?;
        Self::check_date_range(dto.start_date, dto.end_date)?;

        let note = dto.note.as_deref().unwrap_or("").trim().to_string();

        let leave = sqlx::query_as::<_, LeaveRecord>(
            "UPDATE leave_records
             SET teacher_id = $1, start_date = $2, end_date = $3, kind = $4, note = $5,
                 approved_by = $6, updated_at = NOW()
             WHERE id = $7 AND school_id = $8
             RETURNING id, teacher_id, school_id, start_date, end_date, kind, note, approved_by,
                       created_at, updated_at",
        )
        .bind(dto.teacher_id)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .bind(dto.kind)
        .bind(&note)
        .bind(recorded_by)
        .bind(leave_id)
        .bind(school_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Leave record not found")))?;

        Ok(leave)
    }

    #[instrument(skip(db), fields(school.id = %school_id))]
    pub async fn delete_leave(
        db: &PgPool,
        leave_id: Uuid,
        school_id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM leave_records WHERE id = $1 AND school_id = $2")
            .bind(leave_id)
            .bind(school_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Leave record not found"
            )));
        }

        info!(leave.id = %leave_id, school.id = %school_id, "Leave record deleted");

        Ok(())
    }
}
