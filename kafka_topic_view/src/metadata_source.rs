use crate::error::SourceError;
use crate::snapshot::BrokerId;
use std::collections::HashMap;
use std::future::Future;

/// Topic name -> config key -> value, holding only explicitly set topic overrides.
pub type TopicConfigs = HashMap<String, HashMap<String, String>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicDescription {
    pub name: String,
    pub partitions: Vec<PartitionDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionDescription {
    pub id: i32,
    pub leader: BrokerId,
    pub replicas: Vec<BrokerId>,
    pub isr: Vec<BrokerId>,
    pub offline_replicas: Vec<BrokerId>,
}

/// Read-only view of the cluster used by a refresh cycle.
///
/// Implementations own timeouts and retries; errors are passed through to the
/// cycle unchanged.
pub trait MetadataSource: Send + Sync {
    fn list_brokers(&self) -> impl Future<Output = Result<Vec<BrokerId>, SourceError>> + Send;

    fn describe_broker_config(
        &self,
        broker_id: BrokerId,
        keys: &[&str],
    ) -> impl Future<Output = Result<HashMap<String, String>, SourceError>> + Send;

    fn list_topic_configs(&self) -> impl Future<Output = Result<TopicConfigs, SourceError>> + Send;

    fn describe_all_topics(
        &self,
    ) -> impl Future<Output = Result<Vec<TopicDescription>, SourceError>> + Send;
}
