mod admin_wrapper;
mod kafka_metadata_source;

pub use admin_wrapper::*;
pub use kafka_metadata_source::*;
