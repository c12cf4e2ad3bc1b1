use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// The fixed set of leave types a record can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "leave_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LeaveKind {
    Vacation,
    Illness,
    Personal,
    Training,
    Other,
}

impl LeaveKind {
    pub const ALL: [LeaveKind; 5] = [
        LeaveKind::Vacation,
        LeaveKind::Illness,
        LeaveKind::Personal,
        LeaveKind::Training,
        LeaveKind::Other,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaveRecord {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub school_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub kind: LeaveKind,
    pub note: String,
    /// Account that recorded the leave. Always present; stamped on create
    /// and re-stamped on update.
    pub approved_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing/detail row: the leave record joined with its teacher's name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaveWithTeacher {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub teacher_name: String,
    pub school_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub kind: LeaveKind,
    pub note: String,
    pub approved_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLeaveDto {
    pub teacher_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub kind: LeaveKind,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLeaveDto {
    pub teacher_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub kind: LeaveKind,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct LeaveFilterParams {
    /// Restrict the listing to one teacher's history
    pub teacher_id: Option<Uuid>,
    #[serde(flatten)]
    pub pagination: crate::utils::pagination::PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedLeavesResponse {
    pub data: Vec<LeaveWithTeacher>,
    pub meta: crate::utils::pagination::PaginationMeta,
}
