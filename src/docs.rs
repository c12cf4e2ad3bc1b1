use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::accounts::model::{
    Account, AccountOverview, AccountRole, AccountStatus,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    LoginRequest, LoginResponse, MessageResponse, ProfileResponse, RegisterRequestDto,
};
use crate::modules::leaves::model::{
    CreateLeaveDto, LeaveKind, LeaveRecord, LeaveWithTeacher, PaginatedLeavesResponse,
    UpdateLeaveDto,
};
use crate::modules::schools::model::School;
use crate::modules::teachers::model::{CreateTeacherDto, Teacher, UpdateTeacherDto};
use crate::utils::pagination::{PaginationMeta, PaginationParams};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_account,
        crate::modules::auth::controller::login_account,
        crate::modules::auth::controller::logout_account,
        crate::modules::auth::controller::get_profile,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::leaves::controller::create_leave,
        crate::modules::leaves::controller::get_leaves,
        crate::modules::leaves::controller::get_leave_kinds,
        crate::modules::leaves::controller::get_leave,
        crate::modules::leaves::controller::update_leave,
        crate::modules::leaves::controller::delete_leave,
        crate::modules::accounts::controller::list_accounts,
        crate::modules::accounts::controller::approve_account,
        crate::modules::accounts::controller::reject_account,
    ),
    components(
        schemas(
            Account,
            AccountOverview,
            AccountRole,
            AccountStatus,
            School,
            Teacher,
            CreateTeacherDto,
            UpdateTeacherDto,
            LeaveRecord,
            LeaveWithTeacher,
            LeaveKind,
            CreateLeaveDto,
            UpdateLeaveDto,
            PaginatedLeavesResponse,
            RegisterRequestDto,
            LoginRequest,
            LoginResponse,
            ProfileResponse,
            MessageResponse,
            ErrorResponse,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and session management"),
        (name = "Teachers", description = "Tenant-scoped teacher registry"),
        (name = "Leaves", description = "Tenant-scoped leave records"),
        (name = "Administration", description = "Trial approval and account blocking")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
