use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::access::require_access;
use crate::middleware::role::require_platform_admin;
use crate::modules::accounts::router::init_admin_router;
use crate::modules::auth::router::init_auth_router;
use crate::modules::leaves::router::init_leaves_router;
use crate::modules::teachers::router::init_teachers_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .route("/health", get(|| async { "OK" }))
                .nest("/auth", init_auth_router())
                .nest(
                    "/teachers",
                    init_teachers_router().route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        require_access,
                    )),
                )
                .nest(
                    "/leaves",
                    init_leaves_router().route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        require_access,
                    )),
                )
                .nest(
                    "/admin",
                    init_admin_router().route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        require_platform_admin,
                    )),
                ),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
