use axum::body::Body;
use axum::http::{Request, StatusCode};
use docentia::config::cors::CorsConfig;
use docentia::config::jwt::JwtConfig;
use docentia::router::init_router;
use docentia::state::AppState;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub fn setup_test_app(pool: PgPool) -> axum::Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
    };
    init_router(state)
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

pub fn generate_unique_school_name() -> String {
    format!("Test School {}", Uuid::new_v4())
}

async fn into_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, body)
}

pub async fn request(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    into_json(response).await
}

pub async fn register(
    app: &axum::Router,
    email: &str,
    password: &str,
    school_name: &str,
) -> (StatusCode, Value) {
    request(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": email,
            "password": password,
            "school_name": school_name
        })),
    )
    .await
}

pub async fn login(app: &axum::Router, email: &str, password: &str) -> (StatusCode, Value) {
    request(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({
            "email": email,
            "password": password
        })),
    )
    .await
}

/// Register a fresh member account in its own school and log it in.
/// Returns the access token and the account's school name.
#[allow(dead_code)]
pub async fn register_and_login(app: &axum::Router) -> (String, String) {
    let email = generate_unique_email();
    let school_name = generate_unique_school_name();

    let (status, _) = register(app, &email, "testpass123", &school_name).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = login(app, &email, "testpass123").await;
    assert_eq!(status, StatusCode::OK);

    (
        body["access_token"].as_str().unwrap().to_string(),
        school_name,
    )
}

/// Seed a platform admin directly and log it in through the API.
#[allow(dead_code)]
pub async fn admin_token(app: &axum::Router, pool: &PgPool) -> String {
    let email = generate_unique_email();

    docentia::cli::create_platform_admin(pool, &email, "adminpass123", "Head Office")
        .await
        .unwrap();

    let (status, body) = login(app, &email, "adminpass123").await;
    assert_eq!(status, StatusCode::OK);

    body["access_token"].as_str().unwrap().to_string()
}

#[allow(dead_code)]
pub async fn create_teacher(app: &axum::Router, token: &str, name: &str) -> (StatusCode, Value) {
    request(
        app,
        "POST",
        "/api/teachers",
        Some(token),
        Some(json!({ "name": name })),
    )
    .await
}

#[allow(dead_code)]
pub async fn create_leave(
    app: &axum::Router,
    token: &str,
    teacher_id: &str,
    start_date: &str,
    end_date: &str,
    kind: &str,
) -> (StatusCode, Value) {
    request(
        app,
        "POST",
        "/api/leaves",
        Some(token),
        Some(json!({
            "teacher_id": teacher_id,
            "start_date": start_date,
            "end_date": end_date,
            "kind": kind
        })),
    )
    .await
}
