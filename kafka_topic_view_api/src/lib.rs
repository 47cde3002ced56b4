pub mod app_config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod startup;

use kafka_topic_view::snapshot_store::SnapshotStore;
use std::sync::Arc;

/// State shared by all request handlers.
pub struct AppState {
    pub store: Arc<SnapshotStore>,
    pub verbose: bool,
}

impl AppState {
    pub fn new(store: Arc<SnapshotStore>, verbose: bool) -> Self {
        Self { store, verbose }
    }
}
