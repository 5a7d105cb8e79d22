//! Vigil API /v1: REST endpoints over the safety pipeline
pub mod handlers;
pub mod offline;
pub mod pipeline;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use pipeline::{Evaluation, ExternalServices, Pipeline};

pub async fn create_app(pipeline: Arc<Pipeline>) -> Router {
    Router::new()
        .route("/v1/events/:id/audio", post(handlers::ingest_audio))
        .route("/v1/events/:id/video", post(handlers::ingest_video))
        .route("/v1/events/:id/evaluate", post(handlers::evaluate))
        .route("/v1/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(pipeline)
}

pub async fn run(addr: &str, pipeline: Arc<Pipeline>) {
    let app = create_app(pipeline).await;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");

    tracing::info!("Vigil API listening on {}", addr);
    axum::serve(listener, app).await.expect("Server error");
}
