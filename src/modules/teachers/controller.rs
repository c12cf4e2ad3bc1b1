use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::teachers::model::{CreateTeacherDto, Teacher, UpdateTeacherDto};
use crate::modules::teachers::service::TeacherService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Register a teacher in the caller's school
#[utoipa::path(
    post,
    path = "/api/teachers",
    request_body = CreateTeacherDto,
    responses(
        (status = 201, description = "Teacher created", body = Teacher),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
        (status = 422, description = "Validation error")
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_teacher(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateTeacherDto>,
) -> Result<(StatusCode, Json<Teacher>), AppError> {
    let teacher = TeacherService::create_teacher(&state.db, auth_user.school_id(), dto).await?;
    Ok((StatusCode::CREATED, Json(teacher)))
}

/// List the caller's teachers, ordered by name
#[utoipa::path(
    get,
    path = "/api/teachers",
    responses(
        (status = 200, description = "Teachers of the caller's school", body = Vec<Teacher>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied")
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_teachers(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Teacher>>, AppError> {
    let teachers = TeacherService::get_teachers_by_school(&state.db, auth_user.school_id()).await?;
    Ok(Json(teachers))
}

/// Fetch one teacher
#[utoipa::path(
    get,
    path = "/api/teachers/{id}",
    params(
        ("id" = Uuid, Path, description = "Teacher ID")
    ),
    responses(
        (status = 200, description = "Teacher details", body = Teacher),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Teacher not found")
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_teacher(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Teacher>, AppError> {
    let teacher = TeacherService::get_teacher_by_id(&state.db, id, auth_user.school_id()).await?;
    Ok(Json(teacher))
}

/// Rename a teacher
#[utoipa::path(
    put,
    path = "/api/teachers/{id}",
    params(
        ("id" = Uuid, Path, description = "Teacher ID")
    ),
    request_body = UpdateTeacherDto,
    responses(
        (status = 200, description = "Teacher updated", body = Teacher),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Teacher not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_teacher(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateTeacherDto>,
) -> Result<Json<Teacher>, AppError> {
    let teacher =
        TeacherService::update_teacher(&state.db, id, auth_user.school_id(), dto).await?;
    Ok(Json(teacher))
}

/// Delete a teacher with no recorded leave
#[utoipa::path(
    delete,
    path = "/api/teachers/{id}",
    params(
        ("id" = Uuid, Path, description = "Teacher ID")
    ),
    responses(
        (status = 204, description = "Teacher deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied"),
        (status = 404, description = "Teacher not found"),
        (status = 409, description = "Teacher has recorded leave")
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_teacher(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    TeacherService::delete_teacher(&state.db, id, auth_user.school_id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
