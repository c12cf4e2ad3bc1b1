use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Length of the free trial granted to every newly registered account.
pub const TRIAL_PERIOD_DAYS: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "account_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    Member,
    PlatformAdmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "account_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Trial,
    Active,
    PendingApproval,
    Blocked,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub school_id: Uuid,
    pub role: AccountRole,
    pub status: AccountStatus,
    pub registered_at: DateTime<Utc>,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub permanently_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of evaluating an account against the access policy at a given
/// instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Granted { days_remaining: Option<i64> },
    Denied(AccessDenial),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenial {
    Blocked,
    TrialExpired,
}

impl AccessDenial {
    pub fn message(&self) -> &'static str {
        match self {
            AccessDenial::Blocked => "Your account has been blocked",
            AccessDenial::TrialExpired => {
                "Your trial period has ended. Awaiting administrator approval"
            }
        }
    }
}

impl Account {
    /// Evaluate the access policy for this account at `now`.
    ///
    /// Policy: a blocked account is always denied, even when
    /// `permanently_approved` is set; rejection wins without having to clear
    /// the approval flag. Otherwise permanent approval grants access, an
    /// account with no trial deadline grants access, and a trial account is
    /// granted access until its deadline passes.
    pub fn access(&self, now: DateTime<Utc>) -> AccessDecision {
        if self.status == AccountStatus::Blocked {
            return AccessDecision::Denied(AccessDenial::Blocked);
        }

        if self.permanently_approved {
            return AccessDecision::Granted {
                days_remaining: None,
            };
        }

        match self.trial_ends_at {
            None => AccessDecision::Granted {
                days_remaining: None,
            },
            Some(deadline) if now > deadline => AccessDecision::Denied(AccessDenial::TrialExpired),
            Some(deadline) => AccessDecision::Granted {
                days_remaining: Some(days_remaining(deadline, now)),
            },
        }
    }

    pub fn has_access(&self, now: DateTime<Utc>) -> bool {
        matches!(self.access(now), AccessDecision::Granted { .. })
    }

    /// Whole days left on the trial, never negative. `None` when the account
    /// has no trial deadline.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        self.trial_ends_at
            .map(|deadline| days_remaining(deadline, now))
    }
}

pub fn days_remaining(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (deadline - now).num_days().max(0)
}

/// Admin-facing view of a member account, including its school and the
/// current trial countdown.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountOverview {
    pub id: Uuid,
    pub email: String,
    pub school_id: Uuid,
    pub school_name: String,
    pub status: AccountStatus,
    pub registered_at: DateTime<Utc>,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub permanently_approved: bool,
    pub days_remaining: Option<i64>,
}

/// Row shape for the admin listing query; `days_remaining` is computed in
/// the service from the fetch-time clock.
#[derive(Debug, FromRow)]
pub struct AccountWithSchool {
    pub id: Uuid,
    pub email: String,
    pub school_id: Uuid,
    pub school_name: String,
    pub status: AccountStatus,
    pub registered_at: DateTime<Utc>,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub permanently_approved: bool,
}

impl AccountWithSchool {
    pub fn into_overview(self, now: DateTime<Utc>) -> AccountOverview {
        let days = self.trial_ends_at.map(|deadline| days_remaining(deadline, now));
        AccountOverview {
            id: self.id,
            email: self.email,
            school_id: self.school_id,
            school_name: self.school_name,
            status: self.status,
            registered_at: self.registered_at,
            trial_ends_at: self.trial_ends_at,
            permanently_approved: self.permanently_approved,
            days_remaining: days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn account(
        status: AccountStatus,
        trial_ends_at: Option<DateTime<Utc>>,
        permanently_approved: bool,
    ) -> Account {
        let now = fixed_now();
        Account {
            id: Uuid::new_v4(),
            email: "teacher@school.test".to_string(),
            school_id: Uuid::new_v4(),
            role: AccountRole::Member,
            status,
            registered_at: now - Duration::days(1),
            trial_ends_at,
            permanently_approved,
            created_at: now - Duration::days(1),
            updated_at: now - Duration::days(1),
        }
    }

    #[test]
    fn test_access_granted_while_trial_is_running() {
        let now = fixed_now();
        let acct = account(AccountStatus::Trial, Some(now + Duration::days(15)), false);

        assert_eq!(
            acct.access(now),
            AccessDecision::Granted {
                days_remaining: Some(15)
            }
        );
        assert!(acct.has_access(now));
    }

    #[test]
    fn test_access_denied_after_trial_deadline() {
        let now = fixed_now();
        let acct = account(AccountStatus::Trial, Some(now - Duration::seconds(1)), false);

        assert_eq!(
            acct.access(now),
            AccessDecision::Denied(AccessDenial::TrialExpired)
        );
        assert!(!acct.has_access(now));
    }

    #[test]
    fn test_access_granted_exactly_at_deadline() {
        let now = fixed_now();
        let acct = account(AccountStatus::Trial, Some(now), false);

        assert!(acct.has_access(now));
        assert_eq!(acct.days_remaining(now), Some(0));
    }

    #[test]
    fn test_permanent_approval_grants_access_without_countdown() {
        let now = fixed_now();
        let acct = account(AccountStatus::Active, Some(now - Duration::days(30)), true);

        assert_eq!(
            acct.access(now),
            AccessDecision::Granted {
                days_remaining: None
            }
        );
    }

    #[test]
    fn test_missing_deadline_grants_access() {
        let now = fixed_now();
        let acct = account(AccountStatus::Active, None, false);

        assert!(acct.has_access(now));
        assert_eq!(acct.days_remaining(now), None);
    }

    #[test]
    fn test_blocked_denies_access_even_when_approved() {
        let now = fixed_now();
        let acct = account(AccountStatus::Blocked, None, true);

        assert_eq!(
            acct.access(now),
            AccessDecision::Denied(AccessDenial::Blocked)
        );
    }

    #[test]
    fn test_pending_approval_without_approval_is_denied() {
        let now = fixed_now();
        let acct = account(
            AccountStatus::PendingApproval,
            Some(now - Duration::days(3)),
            false,
        );

        assert_eq!(
            acct.access(now),
            AccessDecision::Denied(AccessDenial::TrialExpired)
        );
    }

    #[test]
    fn test_days_remaining_floors_partial_days() {
        let now = fixed_now();
        let acct = account(
            AccountStatus::Trial,
            Some(now + Duration::hours(36)),
            false,
        );

        assert_eq!(acct.days_remaining(now), Some(1));
    }

    #[test]
    fn test_days_remaining_never_negative() {
        let now = fixed_now();
        let acct = account(AccountStatus::Trial, Some(now - Duration::days(10)), false);

        assert_eq!(acct.days_remaining(now), Some(0));
    }

    #[test]
    fn test_days_remaining_is_non_increasing_over_time() {
        let now = fixed_now();
        let acct = account(AccountStatus::Trial, Some(now + Duration::days(15)), false);

        let mut previous = i64::MAX;
        for hours in (0..24 * 20).step_by(7) {
            let later = now + Duration::hours(hours as i64);
            let days = acct.days_remaining(later).unwrap();
            assert!(days <= previous);
            assert!(days >= 0);
            previous = days;
        }
    }
}
