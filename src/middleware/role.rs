//! Role-based authorization for the platform-admin surface.
//!
//! Admin rights come from the `role` column on the account, carried in the
//! JWT claims, rather than from any particular email address.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Middleware layer for routes reserved to platform administrators.
///
/// ```rust,ignore
/// use axum::{Router, middleware};
/// use crate::middleware::role::require_platform_admin;
///
/// let admin_routes = Router::new()
///     .nest("/admin", init_admin_router())
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_platform_admin));
/// ```
pub async fn require_platform_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();

    let auth_user = match AuthUser::from_request_parts(&mut parts, &state).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    if !auth_user.is_platform_admin() {
        return AppError::forbidden(anyhow::anyhow!(
            "Access denied. Platform administrator privileges required."
        ))
        .into_response();
    }

    let req = Request::from_parts(parts, body);
    next.run(req).await
}
