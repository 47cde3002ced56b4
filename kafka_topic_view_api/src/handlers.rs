use crate::error::ApplicationError;
use crate::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::sync::Arc;
use tracing::debug;

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: &'static str,
    pub refreshed_at: Option<String>,
    pub brokers: usize,
}

/// GET /api/topics
#[tracing::instrument(skip_all)]
pub async fn topics(State(state): State<Arc<AppState>>) -> Result<Response, ApplicationError> {
    let snapshot = state.store.current();

    let mut body = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut body, PrettyFormatter::with_indent(b"    "));
    snapshot
        .serialize(&mut serializer)
        .map_err(ApplicationError::Serialization)?;

    if state.verbose {
        debug!("Got API request - responding: {}", String::from_utf8_lossy(&body));
    }

    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// GET /api/health
#[tracing::instrument(skip_all)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = state.store.current();

    Json(HealthResponse {
        status: "ok",
        refreshed_at: snapshot.refreshed_at().map(|at| at.to_rfc3339()),
        brokers: snapshot.broker_count(),
    })
}

pub async fn not_implemented() -> StatusCode {
    StatusCode::NOT_IMPLEMENTED
}
