use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{approve_account, list_accounts, reject_account};

pub fn init_admin_router() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts/{id}/approve", post(approve_account))
        .route("/accounts/{id}/reject", post(reject_account))
}
