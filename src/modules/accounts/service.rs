use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::modules::accounts::model::{
    AccessDecision, AccessDenial, Account, AccountOverview, AccountRole, AccountStatus,
    AccountWithSchool,
};
use crate::utils::errors::AppError;

/// Result of a successful access check. `days_remaining` is populated only
/// while the account is still inside its trial window.
#[derive(Debug, Clone, Copy)]
pub struct AccessGrant {
    pub days_remaining: Option<i64>,
}

pub struct AccountService;

impl AccountService {
    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, account_id: Uuid) -> Result<Account, AppError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, email, school_id, role, status, registered_at, trial_ends_at,
                    permanently_approved, created_at, updated_at
             FROM accounts WHERE id = $1",
        )
        .bind(account_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Account not found")))?;

        Ok(account)
    }

    /// Decide whether the account may use the system right now.
    ///
    /// Denial of an expired trial also advances the stored status from
    /// `trial` to `pending_approval`. The transition is a single conditional
    /// UPDATE, so two concurrent requests from the same expired account
    /// cannot disagree: whichever lands second matches zero rows.
    #[instrument(skip(db))]
    pub async fn check_access(db: &PgPool, account_id: Uuid) -> Result<AccessGrant, AppError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, email, school_id, role, status, registered_at, trial_ends_at,
                    permanently_approved, created_at, updated_at
             FROM accounts WHERE id = $1",
        )
        .bind(account_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!("Account no longer exists")))?;

        match account.access(Utc::now()) {
            AccessDecision::Granted { days_remaining } => Ok(AccessGrant { days_remaining }),
            AccessDecision::Denied(denial) => {
                if denial == AccessDenial::TrialExpired && account.status == AccountStatus::Trial {
                    sqlx::query(
                        "UPDATE accounts SET status = $1, updated_at = NOW()
                         WHERE id = $2 AND status = $3",
                    )
                    .bind(AccountStatus::PendingApproval)
                    .bind(account.id)
                    .bind(AccountStatus::Trial)
                    .execute(db)
                    .await?;

                    info!(
                        account.id = %account.id,
                        account.email = %account.email,
                        "Trial expired, account moved to pending approval"
                    );
                }

                Err(AppError::forbidden(anyhow::anyhow!("{}", denial.message())))
            }
        }
    }

    /// Grant an account permanent access. Clears the trial deadline so the
    /// countdown disappears from every listing.
    #[instrument(skip(db))]
    pub async fn approve(db: &PgPool, account_id: Uuid) -> Result<Account, AppError> {
        let account = sqlx::query_as::<_, Account>(
            "UPDATE accounts
             SET permanently_approved = TRUE, status = $1, trial_ends_at = NULL, updated_at = NOW()
             WHERE id = $2
             RETURNING id, email, school_id, role, status, registered_at, trial_ends_at,
                       permanently_approved, created_at, updated_at",
        )
        .bind(AccountStatus::Active)
        .bind(account_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Account not found")))?;

        info!(account.id = %account.id, account.email = %account.email, "Account approved permanently");

        Ok(account)
    }

    /// Block an account. The permanent-approval flag is deliberately left
    /// untouched; a blocked status denies access regardless of it.
    #[instrument(skip(db))]
    pub async fn reject(db: &PgPool, account_id: Uuid) -> Result<Account, AppError> {
        let account = sqlx::query_as::<_, Account>(
            "UPDATE accounts SET status = $1, updated_at = NOW()
             WHERE id = $2
             RETURNING id, email, school_id, role, status, registered_at, trial_ends_at,
                       permanently_approved, created_at, updated_at",
        )
        .bind(AccountStatus::Blocked)
        .bind(account_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Account not found")))?;

        info!(account.id = %account.id, account.email = %account.email, "Account blocked");

        Ok(account)
    }

    /// Member accounts across all schools, newest registration first.
    #[instrument(skip(db))]
    pub async fn list_members(db: &PgPool) -> Result<Vec<AccountOverview>, AppError> {
        let rows = sqlx::query_as::<_, AccountWithSchool>(
            "SELECT a.id, a.email, a.school_id, s.name AS school_name, a.status,
                    a.registered_at, a.trial_ends_at, a.permanently_approved
             FROM accounts a
             INNER JOIN schools s ON s.id = a.school_id
             WHERE a.role = $1
             ORDER BY a.registered_at DESC",
        )
        .bind(AccountRole::Member)
        .fetch_all(db)
        .await?;

        let now = Utc::now();
        Ok(rows.into_iter().map(|row| row.into_overview(now)).collect())
    }
}
