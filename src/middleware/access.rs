//! Access-state enforcement for tenant routes.
//!
//! Authentication proves who the caller is; this layer decides whether the
//! account may use the system at all. A blocked account or one whose trial
//! ran out is turned away with 403, and an expired trial is moved to
//! `pending_approval` as a side effect of the check.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::middleware::auth::AuthUser;
use crate::modules::accounts::service::AccountService;
use crate::state::AppState;

/// Middleware layer for route groups that require a live, access-granted
/// account.
///
/// ```rust,ignore
/// use axum::{Router, middleware};
/// use crate::middleware::access::require_access;
///
/// let routes = Router::new()
///     .nest("/teachers", init_teachers_router())
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_access));
/// ```
pub async fn require_access(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let auth_user = match AuthUser::from_request_parts(&mut parts, &state).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    let account_id = match auth_user.account_id() {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };

    if let Err(e) = AccountService::check_access(&state.db, account_id).await {
        return e.into_response();
    }

    let req = Request::from_parts(parts, body);
    next.run(req).await
}
