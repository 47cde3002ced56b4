use crate::error::RefreshError;
use crate::metadata_source::{MetadataSource, TopicConfigs};
use crate::snapshot::BrokerId;
use tracing::{debug, trace};

pub const MIN_ISR_CONFIG: &str = "min.insync.replicas";
pub const TRANSACTION_STATE_MIN_ISR_CONFIG: &str = "transaction.state.log.min.isr";
pub const TRANSACTION_STATE_TOPIC: &str = "__transaction_state";

const DEFAULT_MIN_ISR: i32 = 1;
const DEFAULT_TRANSACTION_STATE_MIN_ISR: i32 = 2;

/// Cluster-wide min-ISR thresholds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct IsrPolicy {
    pub cluster_min_isr: i32,
    pub cluster_min_txn_isr: i32,
}

impl Default for IsrPolicy {
    fn default() -> Self {
        Self {
            cluster_min_isr: DEFAULT_MIN_ISR,
            cluster_min_txn_isr: DEFAULT_TRANSACTION_STATE_MIN_ISR,
        }
    }
}

/// Asks brokers, in listing order, for both thresholds and stops at the first broker
/// after which both are known. Values reported by earlier brokers are kept while
/// scanning and a later `0` resets them. Anything still unknown at the end falls back
/// to 1 and 2.
pub async fn resolve_cluster_defaults<S: MetadataSource>(
    source: &S,
    broker_ids: &[BrokerId],
) -> Result<IsrPolicy, RefreshError> {
    let mut min_isr = 0;
    let mut min_txn_isr = 0;

    for broker_id in broker_ids {
        let configs = source
            .describe_broker_config(
                *broker_id,
                &[MIN_ISR_CONFIG, TRANSACTION_STATE_MIN_ISR_CONFIG],
            )
            .await?;
        trace!("Broker {broker_id} configs: {configs:?}");

        if let Some(value) = configs.get(MIN_ISR_CONFIG) {
            min_isr = parse_config_value(MIN_ISR_CONFIG, value)?;
        }

        if let Some(value) = configs.get(TRANSACTION_STATE_MIN_ISR_CONFIG) {
            min_txn_isr = parse_config_value(TRANSACTION_STATE_MIN_ISR_CONFIG, value)?;
        }

        if min_isr != 0 && min_txn_isr != 0 {
            debug!(
                "Found {MIN_ISR_CONFIG}={min_isr} and {TRANSACTION_STATE_MIN_ISR_CONFIG}={min_txn_isr} on broker {broker_id}"
            );
            return Ok(IsrPolicy {
                cluster_min_isr: min_isr,
                cluster_min_txn_isr: min_txn_isr,
            });
        }
    }

    let defaults = IsrPolicy::default();
    let policy = IsrPolicy {
        cluster_min_isr: if min_isr == 0 {
            defaults.cluster_min_isr
        } else {
            min_isr
        },
        cluster_min_txn_isr: if min_txn_isr == 0 {
            defaults.cluster_min_txn_isr
        } else {
            min_txn_isr
        },
    };
    debug!("No broker reported both ISR thresholds, using {policy:?}");

    Ok(policy)
}

/// Threshold for one topic: explicit topic override, then the transaction-state
/// default for `__transaction_state`, then the cluster default.
pub fn resolve_topic_min_isr(
    topic: &str,
    topic_configs: &TopicConfigs,
    policy: &IsrPolicy,
) -> Result<i32, RefreshError> {
    let topic_override = topic_configs
        .get(topic)
        .and_then(|configs| configs.get(MIN_ISR_CONFIG));

    if let Some(value) = topic_override {
        return parse_config_value(MIN_ISR_CONFIG, value);
    }

    if topic == TRANSACTION_STATE_TOPIC {
        Ok(policy.cluster_min_txn_isr)
    } else {
        Ok(policy.cluster_min_isr)
    }
}

fn parse_config_value(key: &str, value: &str) -> Result<i32, RefreshError> {
    value
        .parse::<i32>()
        .map_err(|source| RefreshError::ConfigParse {
            key: key.to_owned(),
            value: value.to_owned(),
            source,
        })
}
