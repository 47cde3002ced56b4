use crate::error::RefreshError;
use crate::metadata_source::MetadataSource;
use crate::snapshot_builder::refresh_cycle;
use crate::snapshot_store::SnapshotStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, Instrument};

/// Runs refresh cycles one after another and publishes each successful snapshot.
pub struct Scheduler<S> {
    source: S,
    store: Arc<SnapshotStore>,
    interval: Duration,
}

impl<S: MetadataSource> Scheduler<S> {
    pub fn new(source: S, store: Arc<SnapshotStore>, interval: Duration) -> Self {
        Self {
            source,
            store,
            interval,
        }
    }

    /// Runs one cycle. On failure the previously published snapshot stays in place.
    pub async fn run_once(&self) -> Result<(), RefreshError> {
        info!("Refreshing topic data");
        let snapshot = refresh_cycle(&self.source).await?;

        info!(
            "Finished refreshing topic data: {} brokers, {} partition replicas. Next refresh will happen in {:?}",
            snapshot.broker_count(),
            snapshot.record_count(),
            self.interval
        );
        self.store.publish(snapshot);

        Ok(())
    }

    /// Loops until `cancellation_token` is cancelled. The first cycle starts immediately;
    /// a cycle still in flight at cancellation is dropped without publishing.
    pub async fn run(self, cancellation_token: CancellationToken) {
        loop {
            let result = select! {
                biased;
                _ = cancellation_token.cancelled() => {
                    info!("Refreshing was cancelled");
                    break;
                }
                result = self.run_once() => result,
            };

            if let Err(e) = result {
                error!("Failed to refresh topic data, keeping previous snapshot: {e:#}");
            }

            select! {
                biased;
                _ = cancellation_token.cancelled() => {
                    info!("Refreshing was cancelled");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }

    pub fn spawn(self, cancellation_token: CancellationToken) -> JoinHandle<()>
    where
        S: 'static,
    {
        let span = tracing::info_span!("scheduler", interval = ?self.interval);
        tokio::task::spawn(self.run(cancellation_token).instrument(span))
    }
}
