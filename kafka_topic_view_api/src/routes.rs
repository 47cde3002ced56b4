use crate::handlers;
use crate::AppState;
use axum::routing::get;
use axum::Router;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .route(
            "/api/topics",
            get(handlers::topics).fallback(handlers::not_implemented),
        )
        .route("/api/health", get(handlers::health))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
