mod adapters;
mod application;
mod domain;
mod services;
mod sweeper;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use adapters::{
    controllers::{
        auth_controller::AuthController, file_controller::FileController,
        health_controller::HealthController, user_controller::UserController,
    },
    repositories::{PgAccountRepository, PgFileRepository},
    state::AppState,
};
use application::repositories::{
    account_repository::AccountRepository, file_repository::FileRepository,
};
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use domain::{
    config::{
        service::ServiceConfig,
        storage::{Provider, StorageConfig, SupabaseConfig},
    },
    tier::TierPolicyTable,
};
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let database_url = std::env::var("DATABASE_URL")
        .expect("ERROR: DATABASE_URL environment variable must be set");
    let jwt_secret =
        std::env::var("JWT_SECRET").expect("ERROR: JWT_SECRET environment variable must be set");
    let admin_secret = std::env::var("ADMIN_SECRET")
        .expect("ERROR: ADMIN_SECRET environment variable must be set");
    let public_origin = std::env::var("PUBLIC_ORIGIN").ok();

    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "5000".to_string())
        .parse::<u16>()
        .expect("PORT must be a valid u16");

    let sweep_interval_secs = std::env::var("SWEEP_INTERVAL_SECS")
        .unwrap_or_else(|_| "900".to_string())
        .parse::<u64>()
        .expect("SWEEP_INTERVAL_SECS must be a valid u64");

    let storage_config = load_storage_config();

    // Configure CORS
    let cors = if let Ok(allowed_origins) = std::env::var("CORS_ALLOWED_ORIGINS") {
        // Parse comma-separated origins
        let origins: Vec<_> = allowed_origins
            .split(',')
            .map(|s| s.trim().parse().expect("Invalid CORS origin"))
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Allow all origins if not specified (only for development)
        CorsLayer::permissive()
    };

    tracing::info!("Connecting to PostgreSQL...");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&database_url)
        .await
        .expect("ERROR: Failed to connect to PostgreSQL database. Check DATABASE_URL and network connectivity.");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database connection established");

    let storage_service = services::create_storage_service(&storage_config)
        .await
        .expect("Failed to create storage service");

    let app_state = AppState {
        config: Arc::new(ServiceConfig {
            public_origin,
            jwt_secret,
            admin_secret,
            sweep_interval_secs,
        }),
        tiers: Arc::new(TierPolicyTable::builtin()),
        file_repository: Arc::new(PgFileRepository::new(pool.clone())) as Arc<dyn FileRepository>,
        account_repository: Arc::new(PgAccountRepository::new(pool)) as Arc<dyn AccountRepository>,
        storage_service,
    };

    tokio::spawn(sweeper::run(
        app_state.clone(),
        std::time::Duration::from_secs(sweep_interval_secs),
    ));

    let router = app(app_state).layer(cors);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("Failed to bind to port");

    tracing::info!("Server listening on 0.0.0.0:{}", port);

    axum::serve(listener, router)
        .await
        .expect("Failed to start server");
}

fn load_storage_config() -> StorageConfig {
    let provider = std::env::var("STORAGE_PROVIDER")
        .unwrap_or_else(|_| "local".to_string())
        .parse::<Provider>()
        .expect("STORAGE_PROVIDER must be 'local' or 'supabase'");

    match provider {
        Provider::Local => StorageConfig::Local {
            root_dir: std::env::var("STORAGE_ROOT")
                .unwrap_or_else(|_| "uploads".to_string())
                .into(),
        },
        Provider::Supabase => StorageConfig::Supabase(SupabaseConfig {
            storage_url: std::env::var("SUPABASE_STORAGE_URL")
                .expect("ERROR: SUPABASE_STORAGE_URL must be set for the supabase provider"),
            api_key: std::env::var("SUPABASE_API_KEY")
                .expect("ERROR: SUPABASE_API_KEY must be set for the supabase provider"),
            bucket_name: std::env::var("SUPABASE_BUCKET")
                .expect("ERROR: SUPABASE_BUCKET must be set for the supabase provider"),
        }),
    }
}

pub(crate) fn app(app_state: AppState) -> Router {
    // Multipart framing adds overhead on top of the largest allowed file.
    let max_body = app_state.tiers.max_upload_bytes() as usize + 1024 * 1024;

    Router::new()
        .route("/health", get(HealthController::health_check))
        .route("/api/auth/register", post(AuthController::register))
        .route("/api/auth/login", post(AuthController::login))
        .route("/api/auth/me", get(AuthController::me))
        .route("/api/files/upload", post(FileController::upload_file))
        .route("/api/files", delete(FileController::cleanup_expired_files))
        .route(
            "/api/files/download/{short_code}",
            post(FileController::download_file),
        )
        .route("/api/files/{short_code}", get(FileController::get_file_info))
        .route("/api/users/profile", get(UserController::get_profile))
        .route("/api/users/files", get(UserController::get_user_files))
        .route("/api/users/analytics", get(UserController::get_analytics))
        .route("/api/users/upgrade", post(UserController::upgrade))
        .layer(DefaultBodyLimit::max(max_body))
        .with_state(app_state)
}
