use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::accounts::model::{Account, AccountRole, AccountStatus, TRIAL_PERIOD_DAYS};
use crate::modules::accounts::service::AccountService;
use crate::modules::schools::service::SchoolService;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_access_token;
use crate::utils::password::{hash_password, verify_password};

use super::model::{LoginRequest, LoginResponse, ProfileResponse, RegisterRequestDto};

pub struct AuthService;

impl AuthService {
    /// Register a new account. The named school is reused when it already
    /// exists, so colleagues registering under the same school name share a
    /// tenant. The account starts on a fixed-length trial.
    #[instrument(skip(db, dto), fields(account.email = %dto.email))]
    pub async fn register(db: &PgPool, dto: RegisterRequestDto) -> Result<Account, AppError> {
        let school_name = dto.school_name.trim();
        if school_name.is_empty() {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "School name must not be empty"
            )));
        }

        let email_taken =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)")
                .bind(&dto.email)
                .fetch_one(db)
                .await?;

        if email_taken {
            warn!(account.email = %dto.email, "Attempted to register an existing email");
            return Err(AppError::conflict(anyhow::anyhow!(
                "This email is already registered"
            )));
        }

        let school = SchoolService::find_or_create(db, school_name).await?;

        let hashed_password = hash_password(&dto.password)?;
        let trial_ends_at = Utc::now() + Duration::days(TRIAL_PERIOD_DAYS);

        let account = sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (email, password, school_id, role, status, trial_ends_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, email, school_id, role, status, registered_at, trial_ends_at,
                       permanently_approved, created_at, updated_at",
        )
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(school.id)
        .bind(AccountRole::Member)
        .bind(AccountStatus::Trial)
        .bind(trial_ends_at)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::conflict(anyhow::anyhow!("This email is already registered"));
            }
            AppError::from(e)
        })?;

        info!(
            account.id = %account.id,
            account.email = %account.email,
            school.id = %school.id,
            "Account registered with trial access"
        );

        Ok(account)
    }

    /// Verify credentials, enforce the access policy and open a session.
    /// Denied accounts never get a session, and an expired trial is moved to
    /// pending approval as part of the check.
    #[instrument(skip(db, dto, jwt_config), fields(account.email = %dto.email))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        #[derive(sqlx::FromRow)]
        struct AccountWithPassword {
            id: Uuid,
            email: String,
            password: String,
            school_id: Uuid,
            role: AccountRole,
            status: AccountStatus,
            registered_at: chrono::DateTime<Utc>,
            trial_ends_at: Option<chrono::DateTime<Utc>>,
            permanently_approved: bool,
            created_at: chrono::DateTime<Utc>,
            updated_at: chrono::DateTime<Utc>,
        }

        let record = sqlx::query_as::<_, AccountWithPassword>(
            "SELECT id, email, password, school_id, role, status, registered_at, trial_ends_at,
                    permanently_approved, created_at, updated_at
             FROM accounts WHERE email = $1",
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!("Invalid email or password")))?;

        let is_valid = verify_password(&dto.password, &record.password)?;
        if !is_valid {
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Invalid email or password"
            )));
        }

        let account = Account {
            id: record.id,
            email: record.email,
            school_id: record.school_id,
            role: record.role,
            status: record.status,
            registered_at: record.registered_at,
            trial_ends_at: record.trial_ends_at,
            permanently_approved: record.permanently_approved,
            created_at: record.created_at,
            updated_at: record.updated_at,
        };

        let grant = AccountService::check_access(db, account.id).await?;

        let session_id = Uuid::new_v4();
        let expires_at = Utc::now() + Duration::seconds(jwt_config.access_token_expiry);
        sqlx::query("INSERT INTO sessions (id, account_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(account.id)
            .bind(expires_at)
            .execute(db)
            .await?;

        let access_token = create_access_token(&account, session_id, jwt_config)?;

        info!(account.id = %account.id, "Login successful");

        Ok(LoginResponse {
            access_token,
            account,
            days_remaining: grant.days_remaining,
        })
    }

    /// Destroy a login session. Deleting an already-deleted session is fine;
    /// logout is idempotent.
    #[instrument(skip(db))]
    pub async fn logout(db: &PgPool, session_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(session_id)
            .execute(db)
            .await?;

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn profile(db: &PgPool, account_id: Uuid) -> Result<ProfileResponse, AppError> {
        let account = AccountService::find_by_id(db, account_id).await?;
        let school = SchoolService::find_by_id(db, account.school_id).await?;

        let now = Utc::now();
        let has_access = account.has_access(now);
        let days_remaining = if account.permanently_approved {
            None
        } else {
            account.days_remaining(now)
        };

        Ok(ProfileResponse {
            account,
            school_name: school.name,
            has_access,
            days_remaining,
        })
    }
}
