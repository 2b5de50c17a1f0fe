//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.
//!
//! All handles (database pool, counter store, rate limiter) are built here
//! once and passed into the router explicitly; nothing is process-global.

use axum::{
    Router, http,
    http::{Method, header},
};
use notes::{PgNoteRepository, notes_router};
use platform::rate_limit::{RateLimitConfig, RateLimiter};
use platform::redis_store::RedisCounterStore;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

/// Per-request deadline for everything downstream of the router.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,notes=info,platform=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Counter store shared by every limiter check
    let redis_url =
        env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    let counter_store = RedisCounterStore::connect(&redis_url).await?;

    // Rate limit configuration, read once at startup; immutable afterwards
    let max_requests: u32 = env_parse("RATE_LIMIT_MAX_REQUESTS", 5);
    let window_secs: u64 = env_parse("RATE_LIMIT_WINDOW_SECS", 60);
    let fail_open: bool = env_parse("RATE_LIMIT_FAIL_OPEN", false);
    let limit_config = RateLimitConfig::new(max_requests, window_secs).with_fail_open(fail_open);

    tracing::info!(
        max_requests = limit_config.max_requests,
        window_secs = limit_config.window.as_secs(),
        fail_open = limit_config.fail_open,
        "Rate limiter configured"
    );

    let limiter = RateLimiter::new(counter_store, limit_config);
    let repo = PgNoteRepository::new(pool);

    // CORS configuration
    let frontend_origins =
        env::var("FRONTEND_ORIGINS").unwrap_or_else(|_| "http://localhost:5500".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
        ]));

    // Build router
    let app = Router::new()
        .merge(notes_router(repo, limiter))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Read an environment variable, falling back to `default` when unset or
/// unparsable.
fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
