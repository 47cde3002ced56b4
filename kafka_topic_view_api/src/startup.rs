use crate::app_config::AppConfig;
use crate::routes;
use crate::AppState;
use anyhow::Context;
use kafka_topic_view::admin::KafkaMetadataSource;
use kafka_topic_view::scheduler::Scheduler;
use kafka_topic_view::snapshot_store::SnapshotStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::select;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub async fn run_until_stopped(config: AppConfig) -> Result<(), anyhow::Error> {
    let connection_settings = config.connection_settings();
    info!(
        "Creating admin client for brokers: {}",
        connection_settings.brokers.join(", ")
    );
    let source = KafkaMetadataSource::create(&connection_settings)
        .context("While creating kafka metadata source")?;

    let store = Arc::new(SnapshotStore::new());
    let cancellation_token = CancellationToken::new();
    let scheduler_handle = Scheduler::new(source, store.clone(), config.fetch_interval)
        .spawn(cancellation_token.clone());

    let app = routes::router(
        Arc::new(AppState::new(store, config.verbose)),
        &config.static_dir,
    );

    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("While binding {}", config.listen_addr))?;
    info!("Creating HTTP server listening on: {}", config.listen_addr);

    let serve_result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancellation_token.clone()))
        .await
        .context("While serving http");

    cancellation_token.cancel();
    scheduler_handle
        .await
        .context("While joining scheduler task")?;

    serve_result
}

async fn shutdown_signal(cancellation_token: CancellationToken) {
    select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                warn!("Failed to listen for shutdown signal: {e}");
            }
            info!("Shutting down");
        }
        _ = cancellation_token.cancelled() => {}
    }
}
