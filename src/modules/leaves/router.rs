use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_leave, delete_leave, get_leave, get_leave_kinds, get_leaves, update_leave,
};

pub fn init_leaves_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_leave).get(get_leaves))
        .route("/kinds", get(get_leave_kinds))
        .route(
            "/{id}",
            get(get_leave).put(update_leave).delete(delete_leave),
        )
}
