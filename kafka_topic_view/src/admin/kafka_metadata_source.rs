use crate::admin::AdminWrapper;
use crate::connection_settings::{ClientSettings, ConnectionSettings};
use crate::error::SourceError;
use crate::metadata_source::{
    MetadataSource, PartitionDescription, TopicConfigs, TopicDescription,
};
use crate::snapshot::BrokerId;
use anyhow::{anyhow, Context};
use rdkafka::admin::{AdminOptions, OwnedResourceSpecifier, ResourceSpecifier};
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use rdkafka::metadata::Metadata;
use rdkafka::util::Timeout;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use tracing::{trace, warn};

/// [`MetadataSource`] backed by a librdkafka admin client.
pub struct KafkaMetadataSource {
    admin: Arc<AdminWrapper>,
    settings: ClientSettings,
}

#[derive(Debug)]
struct ClusterMetadata {
    brokers: Vec<BrokerId>,
    topics: Vec<TopicDescription>,
}

impl KafkaMetadataSource {
    pub fn create(connection_settings: &ConnectionSettings) -> Result<Self, anyhow::Error> {
        let admin = AdminWrapper::create(connection_settings)?;

        Ok(Self {
            admin: Arc::new(admin),
            settings: connection_settings.client.clone(),
        })
    }

    fn admin_options(&self) -> AdminOptions {
        AdminOptions::new().request_timeout(Some(Timeout::After(self.settings.request_timeout)))
    }

    async fn fetch_cluster_metadata(&self) -> Result<ClusterMetadata, SourceError> {
        with_retries(&self.settings, "fetch cluster metadata", || async move {
            let admin = self.admin.clone();
            let timeout = self.settings.request_timeout;

            let handle = tokio::task::spawn_blocking(move || {
                admin
                    .inner()
                    .fetch_metadata(None, Timeout::After(timeout))
                    .map(|metadata| to_cluster_metadata(&metadata))
            });

            handle
                .await
                .context("While joining blocking handle")
                .map_err(SourceError::Metadata)?
                .map_err(|e| kafka_error(e, "While fetching cluster metadata".to_owned()))
        })
        .await
    }
}

impl MetadataSource for KafkaMetadataSource {
    async fn list_brokers(&self) -> Result<Vec<BrokerId>, SourceError> {
        let metadata = self.fetch_cluster_metadata().await?;
        trace!("Found brokers: {:?}", metadata.brokers);

        Ok(metadata.brokers)
    }

    async fn describe_broker_config(
        &self,
        broker_id: BrokerId,
        keys: &[&str],
    ) -> Result<HashMap<String, String>, SourceError> {
        with_retries(&self.settings, "describe broker config", || async move {
            let resources = [ResourceSpecifier::Broker(broker_id)];
            let options = self.admin_options();

            let results = self
                .admin
                .describe_configs(&resources, &options)
                .await
                .map_err(|e| kafka_error(e, format!("While describing configs of broker {broker_id}")))?;

            let mut configs = HashMap::new();
            for result in results {
                let resource = result.map_err(|code| {
                    SourceError::Metadata(anyhow!(
                        "Describing configs of broker {broker_id} failed: {code}"
                    ))
                })?;

                for entry in resource.entries {
                    if !keys.contains(&entry.name.as_str()) {
                        continue;
                    }
                    if let Some(value) = entry.value {
                        configs.insert(entry.name, value);
                    }
                }
            }

            Ok(configs)
        })
        .await
    }

    async fn list_topic_configs(&self) -> Result<TopicConfigs, SourceError> {
        let metadata = self.fetch_cluster_metadata().await?;
        if metadata.topics.is_empty() {
            return Ok(TopicConfigs::new());
        }

        let topics = &metadata.topics;
        with_retries(&self.settings, "describe topic configs", || async move {
            let resources = topics
                .iter()
                .map(|topic| ResourceSpecifier::Topic(topic.name.as_str()))
                .collect::<Vec<_>>();
            let options = self.admin_options();

            let results = self
                .admin
                .describe_configs(&resources, &options)
                .await
                .map_err(|e| kafka_error(e, "While describing topic configs".to_owned()))?;

            let mut topic_configs = TopicConfigs::new();
            for result in results {
                let resource = result.map_err(|code| {
                    SourceError::Metadata(anyhow!("Describing topic configs failed: {code}"))
                })?;

                let OwnedResourceSpecifier::Topic(name) = resource.specifier else {
                    continue;
                };

                let overrides = resource
                    .entries
                    .into_iter()
                    .filter(|entry| !entry.is_default && !entry.is_sensitive)
                    .filter_map(|entry| entry.value.map(|value| (entry.name, value)))
                    .collect::<HashMap<_, _>>();

                if !overrides.is_empty() {
                    topic_configs.insert(name, overrides);
                }
            }

            Ok(topic_configs)
        })
        .await
    }

    async fn describe_all_topics(&self) -> Result<Vec<TopicDescription>, SourceError> {
        let metadata = self.fetch_cluster_metadata().await?;

        Ok(metadata.topics)
    }
}

/// Retries connectivity failures up to `retry_max` times, sleeping `retry_backoff`
/// between attempts. Any other error is returned at once.
async fn with_retries<T, F, Fut>(
    settings: &ClientSettings,
    operation: &str,
    mut call: F,
) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    let mut attempt = 0;
    loop {
        match call().await {
            Err(SourceError::Connectivity(e)) if attempt < settings.retry_max => {
                attempt += 1;
                warn!(
                    "Failed to {operation} (attempt {attempt} of {}), retrying in {:?}: {e:#}",
                    settings.retry_max, settings.retry_backoff
                );
                tokio::time::sleep(settings.retry_backoff).await;
            }
            result => return result,
        }
    }
}

fn to_cluster_metadata(metadata: &Metadata) -> ClusterMetadata {
    let brokers = metadata
        .brokers()
        .iter()
        .map(|broker| broker.id())
        .collect::<Vec<_>>();
    let live_brokers = brokers.iter().copied().collect::<HashSet<_>>();

    let topics = metadata
        .topics()
        .iter()
        .map(|topic| TopicDescription {
            name: topic.name().to_owned(),
            partitions: topic
                .partitions()
                .iter()
                .map(|partition| PartitionDescription {
                    id: partition.id(),
                    leader: partition.leader(),
                    replicas: partition.replicas().to_vec(),
                    isr: partition.isr().to_vec(),
                    offline_replicas: offline_replicas(partition.replicas(), &live_brokers),
                })
                .collect(),
        })
        .collect();

    ClusterMetadata { brokers, topics }
}

// librdkafka does not expose offline replicas, so a replica on a broker missing from
// the metadata broker list counts as offline.
fn offline_replicas(replicas: &[BrokerId], live_brokers: &HashSet<BrokerId>) -> Vec<BrokerId> {
    replicas
        .iter()
        .filter(|replica| !live_brokers.contains(replica))
        .copied()
        .collect()
}

fn kafka_error(error: KafkaError, context: String) -> SourceError {
    let connectivity = is_connectivity_error(error.rdkafka_error_code());
    let error = anyhow::Error::new(error).context(context);

    if connectivity {
        SourceError::Connectivity(error)
    } else {
        SourceError::Metadata(error)
    }
}

fn is_connectivity_error(code: Option<RDKafkaErrorCode>) -> bool {
    matches!(
        code,
        Some(
            RDKafkaErrorCode::BrokerTransportFailure
                | RDKafkaErrorCode::AllBrokersDown
                | RDKafkaErrorCode::Resolve
                | RDKafkaErrorCode::OperationTimedOut
                | RDKafkaErrorCode::RequestTimedOut
                | RDKafkaErrorCode::BrokerNotAvailable
                | RDKafkaErrorCode::NetworkException
        )
    )
}
