use crate::error::SourceError;
use crate::metadata_source::{
    MetadataSource, PartitionDescription, TopicConfigs, TopicDescription,
};
use crate::snapshot::BrokerId;
use anyhow::anyhow;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FailingCall {
    ListBrokers,
    DescribeBrokerConfig,
    ListTopicConfigs,
    DescribeAllTopics,
}

#[derive(Debug, Default)]
struct State {
    brokers: Vec<BrokerId>,
    broker_configs: HashMap<BrokerId, HashMap<String, String>>,
    topic_configs: TopicConfigs,
    topics: Vec<TopicDescription>,
    failing: Option<FailingCall>,
    described_brokers: Vec<BrokerId>,
    cycles: usize,
}

/// In-memory cluster. Clones share state, so a test can keep a handle after moving
/// the source into a scheduler.
#[derive(Debug, Clone, Default)]
pub struct FakeMetadataSource {
    state: Arc<Mutex<State>>,
}

impl FakeMetadataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_brokers(self, brokers: impl IntoIterator<Item = BrokerId>) -> Self {
        self.lock().brokers = brokers.into_iter().collect();
        self
    }

    pub fn with_broker_config(self, broker_id: BrokerId, key: &str, value: &str) -> Self {
        self.lock()
            .broker_configs
            .entry(broker_id)
            .or_default()
            .insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn with_topic_config(self, topic: &str, key: &str, value: &str) -> Self {
        self.lock()
            .topic_configs
            .entry(topic.to_owned())
            .or_default()
            .insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn with_partition(
        self,
        topic: &str,
        id: i32,
        leader: BrokerId,
        replicas: &[BrokerId],
        isr: &[BrokerId],
    ) -> Self {
        let partition = PartitionDescription {
            id,
            leader,
            replicas: replicas.to_vec(),
            isr: isr.to_vec(),
            offline_replicas: vec![],
        };

        {
            let mut state = self.lock();
            match state.topics.iter().position(|t| t.name == topic) {
                Some(index) => state.topics[index].partitions.push(partition),
                None => state.topics.push(TopicDescription {
                    name: topic.to_owned(),
                    partitions: vec![partition],
                }),
            }
        }
        self
    }

    pub fn failing_on(self, call: FailingCall) -> Self {
        self.set_failing(Some(call));
        self
    }

    pub fn set_failing(&self, call: Option<FailingCall>) {
        self.lock().failing = call;
    }

    pub fn set_brokers(&self, brokers: impl IntoIterator<Item = BrokerId>) {
        self.lock().brokers = brokers.into_iter().collect();
    }

    /// Broker ids passed to `describe_broker_config`, in call order.
    pub fn described_brokers(&self) -> Vec<BrokerId> {
        self.lock().described_brokers.clone()
    }

    /// Number of `list_brokers` calls, one per refresh cycle.
    pub fn cycles(&self) -> usize {
        self.lock().cycles
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn check(&self, call: FailingCall) -> Result<(), SourceError> {
        if self.lock().failing == Some(call) {
            return Err(SourceError::Connectivity(anyhow!(
                "Injected failure in {call:?}"
            )));
        }
        Ok(())
    }
}

impl MetadataSource for FakeMetadataSource {
    async fn list_brokers(&self) -> Result<Vec<BrokerId>, SourceError> {
        self.lock().cycles += 1;
        self.check(FailingCall::ListBrokers)?;
        Ok(self.lock().brokers.clone())
    }

    async fn describe_broker_config(
        &self,
        broker_id: BrokerId,
        keys: &[&str],
    ) -> Result<HashMap<String, String>, SourceError> {
        self.lock().described_brokers.push(broker_id);
        self.check(FailingCall::DescribeBrokerConfig)?;

        let state = self.lock();
        let configs = state
            .broker_configs
            .get(&broker_id)
            .map(|configs| {
                configs
                    .iter()
                    .filter(|(key, _)| keys.contains(&key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Ok(configs)
    }

    async fn list_topic_configs(&self) -> Result<TopicConfigs, SourceError> {
        self.check(FailingCall::ListTopicConfigs)?;
        Ok(self.lock().topic_configs.clone())
    }

    async fn describe_all_topics(&self) -> Result<Vec<TopicDescription>, SourceError> {
        self.check(FailingCall::DescribeAllTopics)?;
        Ok(self.lock().topics.clone())
    }
}
