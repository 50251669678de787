use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use chess_review_core::EngineConfig;

mod config;
mod error;
mod routes;

pub struct AppState {
    pub engine: EngineConfig,
    pub analysis_slots: Arc<Semaphore>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env();
    let engine = EngineConfig::from_env();

    if !engine.stockfish_path.exists() {
        tracing::warn!(
            path = %engine.stockfish_path.display(),
            "engine binary not found; analysis requests will fail"
        );
    }

    let state = Arc::new(AppState {
        engine,
        analysis_slots: Arc::new(Semaphore::new(config.max_concurrent_analyses)),
    });

    // The original extension clients call from arbitrary origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(routes::root))
        .route("/ping", get(routes::ping))
        .route("/analyze", post(routes::analyze))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");

    tracing::info!("Server running at http://{addr}");

    axum::serve(listener, app).await.expect("Server error");
}
