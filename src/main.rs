use blog_api::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    repository::{PostgresRepository, RepositoryState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Boots the service in order: configuration, logging, database (with
/// migrations), then the HTTP server. Any failure in this sequence aborts
/// startup instead of limping along half-configured.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast)
    // .env is read before AppConfig so local overrides take effect.
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Log filter
    // RUST_LOG wins when set; otherwise default to chatty own-crate logs.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "blog_api=debug,tower_http=info,axum=trace".into());

    // 3. Log format per environment
    match config.env {
        Env::Local => {
            // Pretty output for a human watching the terminal.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            // JSON lines for the log aggregator.
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Database pool + schema
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

    // Apply pending schema migrations before accepting any traffic.
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("FATAL: Failed to run database migrations.");

    let repo = Arc::new(PostgresRepository::new(pool)) as RepositoryState;

    // 5. Shared state and router
    let app_state = AppState { repo, config };
    let app = create_router(app_state);

    // 6. Serve
    let listener = TcpListener::bind("0.0.0.0:8080").await.unwrap();

    tracing::info!("Listening on 0.0.0.0:8080");
    tracing::info!("API Documentation (Swagger UI) available at: http://localhost:8080/swagger-ui");

    axum::serve(listener, app).await.unwrap();
}
