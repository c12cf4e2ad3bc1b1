mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    admin_token, generate_unique_email, generate_unique_school_name, login, register,
    register_and_login, request, setup_test_app,
};
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_routes_reject_members(pool: PgPool) {
    let app = setup_test_app(pool);
    let (token, _) = register_and_login(&app).await;

    let (status, _) = request(&app, "GET", "/api/admin/accounts", Some(&token), None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_lists_member_accounts(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = admin_token(&app, &pool).await;

    let email = generate_unique_email();
    let school_name = generate_unique_school_name();
    register(&app, &email, "testpass123", &school_name).await;

    let (status, accounts) = request(&app, "GET", "/api/admin/accounts", Some(&admin), None).await;

    assert_eq!(status, StatusCode::OK);
    let accounts = accounts.as_array().unwrap();
    let entry = accounts
        .iter()
        .find(|a| a["email"] == email.as_str())
        .expect("registered member should be listed");
    assert_eq!(entry["school_name"], school_name);
    assert_eq!(entry["status"], "trial");
    assert!(entry["days_remaining"].as_i64().is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_approval_restores_access_after_expiry(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = admin_token(&app, &pool).await;

    let email = generate_unique_email();
    let (_, account) = register(&app, &email, "testpass123", &generate_unique_school_name()).await;
    let account_id = account["id"].as_str().unwrap().to_string();

    sqlx::query("UPDATE accounts SET trial_ends_at = $1 WHERE email = $2")
        .bind(Utc::now() - Duration::days(1))
        .bind(&email)
        .execute(&pool)
        .await
        .unwrap();

    let (status, _) = login(&app, &email, "testpass123").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, approved) = request(
        &app,
        "POST",
        &format!("/api/admin/accounts/{}/approve", account_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "active");
    assert_eq!(approved["permanently_approved"], true);
    assert!(approved["trial_ends_at"].is_null());

    let (status, body) = login(&app, &email, "testpass123").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["days_remaining"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rejection_blocks_account(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = admin_token(&app, &pool).await;

    let email = generate_unique_email();
    let (_, account) = register(&app, &email, "testpass123", &generate_unique_school_name()).await;
    let account_id = account["id"].as_str().unwrap().to_string();

    let (status, rejected) = request(
        &app,
        "POST",
        &format!("/api/admin/accounts/{}/reject", account_id),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rejected["status"], "blocked");

    let (status, body) = login(&app, &email, "testpass123").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("blocked"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rejection_overrides_earlier_approval(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = admin_token(&app, &pool).await;

    let email = generate_unique_email();
    let (_, account) = register(&app, &email, "testpass123", &generate_unique_school_name()).await;
    let account_id = account["id"].as_str().unwrap().to_string();

    request(
        &app,
        "POST",
        &format!("/api/admin/accounts/{}/approve", account_id),
        Some(&admin),
        None,
    )
    .await;
    request(
        &app,
        "POST",
        &format!("/api/admin/accounts/{}/reject", account_id),
        Some(&admin),
        None,
    )
    .await;

    let (status, _) = login(&app, &email, "testpass123").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_decisions_on_unknown_account(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let admin = admin_token(&app, &pool).await;

    let (status, _) = request(
        &app,
        "POST",
        &format!("/api/admin/accounts/{}/approve", uuid::Uuid::new_v4()),
        Some(&admin),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
