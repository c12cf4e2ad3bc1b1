use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{get_profile, login_account, logout_account, register_account};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_account))
        .route("/login", post(login_account))
        .route("/logout", post(logout_account))
        .route("/me", get(get_profile))
}
