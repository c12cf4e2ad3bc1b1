use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::leaves::model::{
    CreateLeaveDto, LeaveFilterParams, LeaveKind, LeaveRecord, LeaveWithTeacher,
    PaginatedLeavesResponse, UpdateLeaveDto,
};
use crate::modules::leaves::service::LeaveService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Record a leave for a teacher of the caller's school
#[utoipa::path(
    post,
    path = "/api/leaves",
    request_body = CreateLeaveDto,
    responses(
        (status = 201, description = "Leave record created", body = LeaveRecord),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Teacher not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Leaves",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_leave(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateLeaveDto>,
) -> Result<(StatusCode, Json<LeaveRecord>), AppError> {
    let leave = LeaveService::create_leave(
        &state.db,
        auth_user.school_id(),
        auth_user.account_id()?,
        dto,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(leave)))
}

/// List leave records, most recent start date first
#[utoipa::path(
    get,
    path = "/api/leaves",
    params(LeaveFilterParams),
    responses(
        (status = 200, description = "Paginated leave records of the caller's school", body = PaginatedLeavesResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied")
    ),
    tag = "Leaves",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_leaves(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(filters): Query<LeaveFilterParams>,
) -> Result<Json<PaginatedLeavesResponse>, AppError> {
    let leaves =
        LeaveService::get_leaves_by_school(&state.db, auth_user.school_id(), filters).await?;
    Ok(Json(leaves))
}

/// The fixed set of leave types
#[utoipa::path(
    get,
    path = "/api/leaves/kinds",
    responses(
        (status = 200, description = "Available leave types", body = Vec<LeaveKind>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied")
    ),
    tag = "Leaves",
    security(("bearer_auth" = []))
)]
#[instrument]
pub async fn get_leave_kinds() -> Json<Vec<LeaveKind>> {
    Json(LeaveKind::ALL.to_vec())
}

/// Fetch one leave record
#[utoipa::path(
    get,
    path = "/api/leaves/{id}",
    params(
        ("id" = Uuid, Path, description = "Leave record ID")
    ),
    responses(
        (status = 200, description = "Leave record details", body = LeaveWithTeacher),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Leave record not found")
    ),
    tag = "Leaves",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_leave(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<LeaveWithTeacher>, AppError> {
    let leave = LeaveService::get_leave_by_id(&state.db, id, auth_user.school_id()).await?;
    Ok(Json(leave))
}

/// Update a leave record
#[utoipa::path(
    put,
    path = "/api/leaves/{id}",
    params(
        ("id" = Uuid, Path, description = "Leave record ID")
    ),
    request_body = UpdateLeaveDto,
    responses(
        (status = 200, description = "Leave record updated", body = LeaveRecord),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Leave record or teacher not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Leaves",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_leave(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateLeaveDto>,
) -> Result<Json<LeaveRecord>, AppError> {
    let leave = LeaveService::update_leave(
        &state.db,
        id,
        auth_user.school_id(),
        auth_user.account_id()?,
        dto,
    )
    .await?;
    Ok(Json(leave))
}

/// Delete a leave record
#[utoipa::path(
    delete,
    path = "/api/leaves/{id}",
    params(
        ("id" = Uuid, Path, description = "Leave record ID")
    ),
    responses(
        (status = 204, description = "Leave record deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Leave record not found")
    ),
    tag = "Leaves",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_leave(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    LeaveService::delete_leave(&state.db, id, auth_user.school_id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
