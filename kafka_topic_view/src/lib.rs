pub mod admin;
pub mod connection_settings;
pub mod error;
pub mod isr_policy;
pub mod metadata_source;
pub mod partition_health;
pub mod scheduler;
pub mod snapshot;
pub mod snapshot_builder;
pub mod snapshot_store;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
