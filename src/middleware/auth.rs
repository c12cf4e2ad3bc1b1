use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use chrono::{DateTime, Utc};

use crate::modules::accounts::model::AccountRole;
use crate::modules::auth::model::Claims;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::verify_token;

/// Extractor that validates the JWT and looks the embedded session up. A
/// token whose session row is gone (logout) or past its expiry is rejected
/// even if the JWT signature is still valid.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The caller's account id.
    pub fn account_id(&self) -> Result<uuid::Uuid, AppError> {
        uuid::Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::unauthorized(anyhow::anyhow!("Invalid account ID in token")))
    }

    /// The caller's tenant. Every teacher/leave query is scoped by this.
    pub fn school_id(&self) -> uuid::Uuid {
        self.0.school_id
    }

    pub fn session_id(&self) -> uuid::Uuid {
        self.0.sid
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn is_platform_admin(&self) -> bool {
        self.0.role == AccountRole::PlatformAdmin
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::unauthorized(anyhow::anyhow!("Missing authorization header"))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized(anyhow::anyhow!("Invalid authorization header format"))
        })?;

        let claims = verify_token(token, &state.jwt_config)?;

        let expires_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT expires_at FROM sessions WHERE id = $1",
        )
        .bind(claims.sid)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!("Session has been revoked")))?;

        if expires_at < Utc::now() {
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Session has expired"
            )));
        }

        Ok(AuthUser(claims))
    }
}
