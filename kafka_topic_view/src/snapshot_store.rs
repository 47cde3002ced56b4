use crate::snapshot::ClusterSnapshot;
use arc_swap::ArcSwap;
use std::sync::Arc;

/// Holds the published snapshot. Readers never block; publishing swaps the whole value.
#[derive(Debug)]
pub struct SnapshotStore {
    current: ArcSwap<ClusterSnapshot>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(ClusterSnapshot::empty()),
        }
    }

    pub fn publish(&self, snapshot: ClusterSnapshot) {
        self.current.store(Arc::new(snapshot));
    }

    pub fn current(&self) -> Arc<ClusterSnapshot> {
        self.current.load_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::PartitionRecord;
    use crate::partition_health::HealthState;
    use chrono::Utc;

    fn snapshot_with_brokers(ids: &[i32]) -> ClusterSnapshot {
        ClusterSnapshot::with_brokers(ids, Utc::now())
    }

    #[test]
    fn starts_with_empty_snapshot() {
        let store = SnapshotStore::new();

        assert_eq!(*store.current(), ClusterSnapshot::empty());
    }

    #[test]
    fn last_publish_wins() {
        let store = SnapshotStore::new();

        store.publish(snapshot_with_brokers(&[1]));
        store.publish(snapshot_with_brokers(&[1, 2]));

        assert_eq!(store.current().broker_count(), 2);
    }

    #[test]
    fn readers_keep_the_snapshot_they_loaded() {
        let store = SnapshotStore::new();
        let mut first = snapshot_with_brokers(&[1]);
        first.push(
            1,
            PartitionRecord {
                topic: "orders".to_owned(),
                partition: 0,
                state: HealthState::Online,
                is_leader: true,
            },
        );
        store.publish(first);

        let loaded = store.current();
        store.publish(snapshot_with_brokers(&[1, 2, 3]));

        assert_eq!(loaded.broker_count(), 1);
        assert_eq!(loaded.record_count(), 1);
        assert_eq!(store.current().broker_count(), 3);
    }

    #[test]
    fn concurrent_readers_see_whole_snapshots() {
        let store = Arc::new(SnapshotStore::new());

        let readers = (0..4)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..1_000 {
                        let count = store.current().broker_count();
                        assert!(count == 0 || count == 2 || count == 5, "{count}");
                    }
                })
            })
            .collect::<Vec<_>>();

        for i in 0..1_000 {
            let ids: &[i32] = if i % 2 == 0 { &[1, 2] } else { &[1, 2, 3, 4, 5] };
            store.publish(snapshot_with_brokers(ids));
        }

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
