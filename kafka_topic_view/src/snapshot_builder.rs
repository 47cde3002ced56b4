use crate::error::RefreshError;
use crate::isr_policy::{resolve_cluster_defaults, resolve_topic_min_isr};
use crate::metadata_source::MetadataSource;
use crate::partition_health::classify;
use crate::snapshot::{ClusterSnapshot, PartitionRecord};
use chrono::Utc;
use tracing::{debug, warn};

/// Builds a complete snapshot from the source. Any failing call aborts the whole cycle.
#[tracing::instrument(skip_all)]
pub async fn refresh_cycle<S: MetadataSource>(source: &S) -> Result<ClusterSnapshot, RefreshError> {
    let broker_ids = source.list_brokers().await?;
    let mut snapshot = ClusterSnapshot::with_brokers(&broker_ids, Utc::now());

    let policy = resolve_cluster_defaults(source, &broker_ids).await?;
    debug!("Resolved ISR policy: {policy:?}");

    let topic_configs = source.list_topic_configs().await?;
    let topics = source.describe_all_topics().await?;

    for topic in &topics {
        let min_isr = resolve_topic_min_isr(&topic.name, &topic_configs, &policy)?;

        for partition in &topic.partitions {
            let state = classify(
                partition.replicas.len(),
                partition.isr.len(),
                partition.offline_replicas.len(),
                min_isr,
            );

            for replica in &partition.replicas {
                let record = PartitionRecord {
                    topic: topic.name.clone(),
                    partition: partition.id,
                    state,
                    is_leader: *replica == partition.leader,
                };

                if snapshot.push(*replica, record) {
                    warn!(
                        "Broker {} hosts {}/{} but was not in the broker listing",
                        replica, topic.name, partition.id
                    );
                }
            }
        }
    }

    Ok(snapshot)
}
