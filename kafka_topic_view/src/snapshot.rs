use crate::partition_health::HealthState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

pub type BrokerId = i32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionRecord {
    pub topic: String,
    pub partition: i32,
    pub state: HealthState,
    #[serde(rename = "leader")]
    pub is_leader: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BrokerPartitions {
    pub partitions: Vec<PartitionRecord>,
}

/// Broker-indexed view of every partition replica at one point in time.
///
/// Serializes as `{"brokers": {"<id>": {"partitions": [...]}}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClusterSnapshot {
    brokers: BTreeMap<BrokerId, BrokerPartitions>,
    #[serde(skip)]
    refreshed_at: Option<DateTime<Utc>>,
}

impl ClusterSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn with_brokers(broker_ids: &[BrokerId], refreshed_at: DateTime<Utc>) -> Self {
        let brokers = broker_ids
            .iter()
            .map(|id| (*id, BrokerPartitions::default()))
            .collect();

        Self {
            brokers,
            refreshed_at: Some(refreshed_at),
        }
    }

    /// Appends a record to the broker's bucket. Returns `true` when the bucket had to be
    /// created because the broker was not part of the initial listing.
    pub(crate) fn push(&mut self, broker_id: BrokerId, record: PartitionRecord) -> bool {
        let created = !self.brokers.contains_key(&broker_id);
        self.brokers
            .entry(broker_id)
            .or_default()
            .partitions
            .push(record);
        created
    }

    pub fn broker_ids(&self) -> impl Iterator<Item = BrokerId> + '_ {
        self.brokers.keys().copied()
    }

    pub fn partitions(&self, broker_id: BrokerId) -> Option<&[PartitionRecord]> {
        self.brokers
            .get(&broker_id)
            .map(|broker| broker.partitions.as_slice())
    }

    pub fn broker_count(&self) -> usize {
        self.brokers.len()
    }

    pub fn record_count(&self) -> usize {
        self.brokers
            .values()
            .map(|broker| broker.partitions.len())
            .sum()
    }

    /// `None` until the first successful refresh.
    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }
}
