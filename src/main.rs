use dotenvy::dotenv;

use docentia::logging::init_tracing;
use docentia::router::init_router;
use docentia::state::init_app_state;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    // Maintenance command, not a server run
    if args.len() > 1 && args[1] == "create-admin" {
        handle_create_admin(args).await;
        return;
    }

    init_tracing();

    let state = init_app_state().await;

    sqlx::migrate!()
        .run(&state.db)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    println!("🚀 Server running on http://localhost:3000");
    println!("📚 Swagger UI available at http://localhost:3000/swagger-ui");
    println!("📖 Scalar UI available at http://localhost:3000/scalar");
    axum::serve(listener, app).await.unwrap();
}

async fn handle_create_admin(args: Vec<String>) {
    if args.len() != 5 {
        eprintln!(
            "Usage: {} create-admin <email> <password> <school_name>",
            args[0]
        );
        std::process::exit(1);
    }

    let email = &args[2];
    let password = &args[3];
    let school_name = &args[4];

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    match docentia::cli::create_platform_admin(&pool, email, password, school_name).await {
        Ok(_) => {
            println!("✅ Platform admin created successfully!");
            println!("   Email: {}", email);
            println!("   School: {}", school_name);
        }
        Err(e) => {
            eprintln!("❌ Error creating platform admin: {}", e);
            std::process::exit(1);
        }
    }
}
