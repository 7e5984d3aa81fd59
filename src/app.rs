use anyhow::Context;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::database::Database;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::mailer;
use crate::state::AppState;

/// Room for multipart boundaries and headers around the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub const DEFAULT_LOG_FILTER: &str = "doc_portal_api=info,tower_http=info";

/// Install the global fmt subscriber. RUST_LOG overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // A second call (tests, CLI after server) keeps the first subscriber
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Protected
        .merge(protected_routes(&state))
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/auth/register", post(auth::register_post))
        .route("/api/auth/login", post(auth::login_post))
        .route("/api/auth/forgot-password", post(auth::forgot_password_post))
}

fn protected_routes(state: &AppState) -> Router<AppState> {
    use protected::{auth, docs};

    let upload_limit = state.config.upload.max_file_size_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/api/auth/profile", get(auth::profile_get).put(auth::profile_put))
        .route("/api/auth/change-password", put(auth::change_password_put))
        .route(
            "/api/docs/upload",
            post(docs::upload_post).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/docs/supported-formats", get(docs::supported_formats_get))
        .route("/api/docs/mydocs", get(docs::mydocs_get))
        .route("/api/docs/all", get(docs::all_get))
        .route("/api/docs/filter", get(docs::filter_get))
        .route("/api/docs/preview/:id", get(docs::preview_get))
        .route("/api/docs/download/:id", get(docs::download_get))
        .route("/api/docs/status/:id", put(docs::status_put))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any)
}

async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Document Portal API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "auth": "/api/auth/{register,login,forgot-password} (public), /api/auth/{profile,change-password} (protected)",
                "docs": "/api/docs/{upload,supported-formats,mydocs,all,filter,preview/:id,download/:id,status/:id} (protected)",
                "health": "/health",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.db.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "error": true,
                    "message": "Database unavailable",
                    "code": "SERVICE_UNAVAILABLE"
                })),
            )
        }
    }
}

/// Open the database, apply migrations and build the shared state
pub async fn build_state(config: AppConfig) -> anyhow::Result<AppState> {
    config.validate()?;

    let db = Database::connect(&config.database)
        .await
        .with_context(|| format!("failed to open database {}", config.database.url))?;
    db.migrate().await?;

    tokio::fs::create_dir_all(&config.upload.root_dir)
        .await
        .with_context(|| format!("failed to create upload dir {}", config.upload.root_dir.display()))?;

    let mailer = mailer::from_config(&config)?;
    Ok(AppState::new(config, db, mailer))
}

/// Run the HTTP server until ctrl-c
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let bind_addr = config.bind_addr();
    let state = build_state(config).await?;
    let db = state.db.clone();

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!(
        environment = state.config.environment.as_str(),
        upload_dir = %state.config.upload.root_dir.display(),
        "Document Portal API listening on http://{}",
        bind_addr
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
