//! API Handlers
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use vigil_core::{EventId, VigilError, VIGIL_VERSION};

use crate::pipeline::Pipeline;

pub async fn ingest_audio(
    State(pipeline): State<Arc<Pipeline>>,
    Path(id): Path<String>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let event_id = EventId::from_raw(id);
    let result =
        tokio::task::spawn_blocking(move || pipeline.ingest_audio(&event_id, &body)).await;
    match result {
        Ok(Ok(analysis)) => (StatusCode::OK, Json(json!({ "analysis": analysis }))),
        Ok(Err(err)) => error_response(err),
        Err(err) => join_error(err),
    }
}

pub async fn ingest_video(
    State(pipeline): State<Arc<Pipeline>>,
    Path(id): Path<String>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let event_id = EventId::from_raw(id);
    let result =
        tokio::task::spawn_blocking(move || pipeline.ingest_video(&event_id, &body)).await;
    match result {
        Ok(Ok(Some(analysis))) => (StatusCode::OK, Json(json!({ "analysis": analysis }))),
        Ok(Ok(None)) => (
            StatusCode::OK,
            Json(json!({ "analysis": null, "gated": true })),
        ),
        Ok(Err(err)) => error_response(err),
        Err(err) => join_error(err),
    }
}

pub async fn evaluate(
    State(pipeline): State<Arc<Pipeline>>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    let event_id = EventId::from_raw(id);
    let result = tokio::task::spawn_blocking(move || pipeline.evaluate(&event_id, None)).await;
    match result {
        Ok(Ok(evaluation)) => (
            StatusCode::OK,
            Json(json!({
                "verdict": evaluation.verdict,
                "report": evaluation.report,
                "actions": evaluation.actions,
                "execution": evaluation.execution,
                "caregiver_message": evaluation.caregiver_message,
            })),
        ),
        Ok(Err(err)) => error_response(err),
        Err(err) => join_error(err),
    }
}

pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "version": VIGIL_VERSION })),
    )
}

// A terminal error fails the whole invocation; the caller retries it.
fn error_response(err: VigilError) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": err.to_string() })),
    )
}

fn join_error(err: tokio::task::JoinError) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": format!("task failed: {err}") })),
    )
}
