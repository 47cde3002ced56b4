use std::num::ParseIntError;
use thiserror::Error;

/// Failure reported by a [`MetadataSource`](crate::metadata_source::MetadataSource) call.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Connectivity error: {0:#}")]
    Connectivity(anyhow::Error),
    #[error("Metadata error: {0:#}")]
    Metadata(anyhow::Error),
}

/// Failure of a whole refresh cycle. No snapshot is produced when this is returned.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("Connectivity error: {0:#}")]
    Connectivity(anyhow::Error),
    #[error("Metadata error: {0:#}")]
    Metadata(anyhow::Error),
    #[error("Config '{key}' has non-integer value '{value}': {source}")]
    ConfigParse {
        key: String,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

impl From<SourceError> for RefreshError {
    fn from(value: SourceError) -> Self {
        match value {
            SourceError::Connectivity(e) => RefreshError::Connectivity(e),
            SourceError::Metadata(e) => RefreshError::Metadata(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use assert_matches::assert_matches;

    #[test]
    fn source_errors_keep_their_kind() {
        let error: RefreshError = SourceError::Connectivity(anyhow!("broker down")).into();
        assert_matches!(error, RefreshError::Connectivity(_));

        let error: RefreshError = SourceError::Metadata(anyhow!("unknown topic")).into();
        assert_matches!(error, RefreshError::Metadata(_));
    }

    #[test]
    fn config_parse_message_names_key_and_value() {
        let source = "two".parse::<i32>().unwrap_err();
        let error = RefreshError::ConfigParse {
            key: "min.insync.replicas".to_owned(),
            value: "two".to_owned(),
            source,
        };

        assert_eq!(
            error.to_string(),
            "Config 'min.insync.replicas' has non-integer value 'two': invalid digit found in string"
        );
    }
}
