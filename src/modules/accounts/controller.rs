use axum::{Json, extract::Path, extract::State};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::accounts::model::{Account, AccountOverview};
use crate::modules::accounts::service::AccountService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// List member accounts awaiting review or already decided
#[utoipa::path(
    get,
    path = "/api/admin/accounts",
    responses(
        (status = 200, description = "Member accounts, newest registration first", body = Vec<AccountOverview>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - platform admin only")
    ),
    tag = "Administration",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountOverview>>, AppError> {
    let accounts = AccountService::list_members(&state.db).await?;
    Ok(Json(accounts))
}

/// Approve an account permanently
#[utoipa::path(
    post,
    path = "/api/admin/accounts/{id}/approve",
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Account approved", body = Account),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - platform admin only"),
        (status = 404, description = "Account not found")
    ),
    tag = "Administration",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn approve_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Account>, AppError> {
    let account = AccountService::approve(&state.db, id).await?;
    Ok(Json(account))
}

/// Block an account
#[utoipa::path(
    post,
    path = "/api/admin/accounts/{id}/reject",
    params(
        ("id" = Uuid, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Account blocked", body = Account),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - platform admin only"),
        (status = 404, description = "Account not found")
    ),
    tag = "Administration",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn reject_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Account>, AppError> {
    let account = AccountService::reject(&state.db, id).await?;
    Ok(Json(account))
}
