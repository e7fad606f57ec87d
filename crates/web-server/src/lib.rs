use analytics::AnalyticsEngine;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use configuration::Config;
use dataset_store::DatasetRepository;
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub repo: DatasetRepository,
    pub engine: Arc<AnalyticsEngine>,
}

impl AppState {
    pub fn new(repo: DatasetRepository, engine: AnalyticsEngine) -> Self {
        Self {
            repo,
            engine: Arc::new(engine),
        }
    }
}

/// Builds the router with every route and middleware layer.
pub fn app(state: AppState, body_limit_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/upload", post(handlers::upload_dataset))
        .route("/api/datasets", get(handlers::list_datasets))
        .route("/api/dataset/:id", delete(handlers::delete_dataset))
        .route("/api/dataset/:id/preview", get(handlers::preview_dataset))
        .route("/api/dataset/:id/columns", get(handlers::dataset_columns))
        .route("/api/dataset/:id/chart", post(handlers::chart))
        .route("/api/dataset/:id/predict", post(handlers::predict))
        .route("/api/dataset/:id/analyze", post(handlers::analyze))
        .with_state(Arc::new(state))
        .layer(cors)
        // Logs information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit_bytes))
}

/// Loads `env_file` into the process environment, then the configuration, so
/// `DATALENS__*` entries in the file take part in the override chain. A
/// missing file is fine; variables already set win over the file.
pub fn load_settings(env_file: &Path) -> anyhow::Result<Config> {
    match dotenvy::from_path(env_file) {
        Ok(()) => tracing::debug!(path = %env_file.display(), "Loaded environment file."),
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e.into()),
    }
    Ok(configuration::load_config()?)
}

/// Configures and runs the web server until it is stopped.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let state = AppState::new(
        DatasetRepository::new(),
        AnalyticsEngine::new(config.analysis.clone()),
    );
    let app = app(state, config.server.body_limit_mb * 1024 * 1024);

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Web server started and listening.");
    axum::serve(listener, app).await?;

    Ok(())
}
