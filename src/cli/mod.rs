use sqlx::PgPool;

use crate::modules::accounts::model::{AccountRole, AccountStatus};
use crate::modules::schools::service::SchoolService;
use crate::utils::password::hash_password;

/// Seed a platform administrator. Admin accounts cannot be created through
/// the API; this runs via the `create-admin` argument of the server binary.
pub async fn create_platform_admin(
    db: &PgPool,
    email: &str,
    password: &str,
    school_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let school = SchoolService::find_or_create(db, school_name.trim())
        .await
        .map_err(|e| format!("Failed to resolve school: {}", e.error))?;

    let result = sqlx::query(
        "INSERT INTO accounts (email, password, school_id, role, status, permanently_approved)
         VALUES ($1, $2, $3, $4, $5, TRUE)
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(email)
    .bind(&hashed_password)
    .bind(school.id)
    .bind(AccountRole::PlatformAdmin)
    .bind(AccountStatus::Active)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err("An account with this email already exists".into());
    }

    Ok(())
}
