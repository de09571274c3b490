use axum::{routing::delete, routing::get, routing::post, Router};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use copymill::app_state::AppState;
use copymill::config::AppConfig;
use copymill::db;
use copymill::routes;
use copymill::services::{auth::AuthService, result_store::ResultStore};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing copymill result relay");

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);

    // Register application metrics
    metrics::describe_counter!(
        "engine_requests_total",
        "Webhook requests sent to the generation engine"
    );
    metrics::describe_counter!(
        "engine_results_received_total",
        "Result callbacks received from the generation engine"
    );
    metrics::describe_counter!("logins_total", "Login attempts by outcome");

    // Initialize database connection pool
    tracing::info!("Connecting to PostgreSQL database");
    let db_pool = db::init_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Run database migrations
    tracing::info!("Running database migrations");
    db::run_migrations(&db_pool)
        .await
        .expect("Failed to run database migrations");

    // Initialize Redis result store
    tracing::info!("Connecting to Redis result store");
    let store = ResultStore::new(&config.redis_url).expect("Failed to initialize result store");

    let auth = AuthService::new(&config.jwt_secret, &config.admin_email);

    // Create shared application state
    let state = AppState::new(db_pool, store, auth);

    // Build API routes
    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/result", post(routes::result::receive_result))
        .route("/api/result/{job_id}", get(routes::result::get_result))
        .route("/api/auth/login", post(routes::auth::login))
        .route(
            "/api/admin/allowlist",
            get(routes::admin::list_allowlist).post(routes::admin::add_to_allowlist),
        )
        .route(
            "/api/admin/allowlist/{id}",
            delete(routes::admin::remove_from_allowlist),
        )
        .with_state(state)
        // Prometheus metrics endpoint (separate state)
        .route(
            "/metrics",
            get(routes::metrics::prometheus_metrics).with_state(prometheus_handle),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(2 * 1024 * 1024)); // 2 MB limit

    tracing::info!("Starting copymill on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
