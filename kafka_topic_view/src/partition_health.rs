use serde::Serialize;
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HealthState {
    Online,
    InSync,
    AtMinIsr,
    UnderMinIsr,
    Offline,
    Unknown,
}

impl Display for HealthState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthState::Online => write!(f, "online"),
            HealthState::InSync => write!(f, "in-sync"),
            HealthState::AtMinIsr => write!(f, "at-min-isr"),
            HealthState::UnderMinIsr => write!(f, "under-min-isr"),
            HealthState::Offline => write!(f, "offline"),
            HealthState::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct PartitionCounts {
    replicas: i64,
    isr: i64,
    offline: i64,
    min_isr: i64,
}

type Rule = (HealthState, fn(&PartitionCounts) -> bool);

// Evaluated top to bottom, first match wins. The offline and unknown rules can never
// fire because the three isr/min_isr comparisons above them cover every integer.
const RULES: [Rule; 6] = [
    (HealthState::Online, fully_replicated),
    (HealthState::InSync, above_min_isr),
    (HealthState::AtMinIsr, at_min_isr),
    (HealthState::UnderMinIsr, under_min_isr),
    (HealthState::Offline, offline_within_replicas),
    (HealthState::Unknown, always),
];

fn fully_replicated(c: &PartitionCounts) -> bool {
    c.isr == c.replicas && c.isr >= c.min_isr
}

fn above_min_isr(c: &PartitionCounts) -> bool {
    c.isr > c.min_isr
}

fn at_min_isr(c: &PartitionCounts) -> bool {
    c.isr == c.min_isr
}

fn under_min_isr(c: &PartitionCounts) -> bool {
    c.isr < c.min_isr
}

fn offline_within_replicas(c: &PartitionCounts) -> bool {
    c.replicas >= c.offline
}

fn always(_: &PartitionCounts) -> bool {
    true
}

fn first_matching_rule(counts: &PartitionCounts) -> usize {
    RULES
        .iter()
        .position(|(_, matches)| matches(counts))
        .unwrap_or(RULES.len() - 1)
}

/// Maps the replica, in-sync and offline counts of one partition to its health state.
pub fn classify(
    replica_count: usize,
    isr_count: usize,
    offline_count: usize,
    effective_min_isr: i32,
) -> HealthState {
    let counts = PartitionCounts {
        replicas: replica_count as i64,
        isr: isr_count as i64,
        offline: offline_count as i64,
        min_isr: effective_min_isr as i64,
    };

    RULES[first_matching_rule(&counts)].0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn all_replicas_in_sync_is_online() {
        assert_eq!(classify(3, 3, 0, 2), HealthState::Online);
    }

    #[test]
    fn full_isr_below_threshold_is_under_min_isr() {
        assert_eq!(classify(1, 1, 0, 2), HealthState::UnderMinIsr);
    }

    #[test]
    fn isr_above_threshold_is_in_sync() {
        assert_eq!(classify(4, 3, 1, 2), HealthState::InSync);
    }

    #[test]
    fn isr_at_threshold_is_at_min_isr() {
        assert_eq!(classify(3, 2, 0, 2), HealthState::AtMinIsr);
    }

    #[test]
    fn isr_below_threshold_is_under_min_isr() {
        assert_eq!(classify(3, 1, 2, 2), HealthState::UnderMinIsr);
    }

    #[test]
    fn empty_isr_is_still_under_min_isr() {
        assert_eq!(classify(3, 0, 3, 1), HealthState::UnderMinIsr);
    }

    #[test]
    fn states_render_in_kebab_case() {
        let rendered = [
            HealthState::Online,
            HealthState::InSync,
            HealthState::AtMinIsr,
            HealthState::UnderMinIsr,
            HealthState::Offline,
            HealthState::Unknown,
        ]
        .iter()
        .map(|state| (state.to_string(), serde_json::to_string(state).unwrap()))
        .collect::<Vec<_>>();

        for (display, json) in rendered {
            assert_eq!(json, format!("\"{display}\""));
        }
    }

    #[test]
    fn trailing_rules_still_match_on_their_own() {
        let counts = PartitionCounts {
            replicas: 3,
            isr: 0,
            offline: 3,
            min_isr: 0,
        };
        assert!(offline_within_replicas(&counts));
        assert!(always(&counts));
        assert_eq!(RULES[4].0, HealthState::Offline);
        assert_eq!(RULES[5].0, HealthState::Unknown);
    }

    proptest! {
        #[test]
        fn classification_never_reaches_offline_or_unknown(
            replicas in 0usize..64,
            isr in 0usize..64,
            offline in 0usize..64,
            min_isr in -4i32..64,
        ) {
            let counts = PartitionCounts {
                replicas: replicas as i64,
                isr: isr as i64,
                offline: offline as i64,
                min_isr: min_isr as i64,
            };
            prop_assert!(first_matching_rule(&counts) < 4);

            let state = classify(replicas, isr, offline, min_isr);
            prop_assert_ne!(state, HealthState::Offline);
            prop_assert_ne!(state, HealthState::Unknown);
            prop_assert_eq!(state, classify(replicas, isr, offline, min_isr));
        }
    }
}
