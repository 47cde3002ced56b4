mod security_protocol;
mod tls_settings;

pub use security_protocol::*;
pub use tls_settings::*;

use anyhow::bail;
use rdkafka::ClientConfig;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub brokers: Vec<String>,
    pub kafka_version: String,
    pub tls: TlsSettings,
    pub client: ClientSettings,
    pub client_debug: bool,
}

/// Timeouts and retry policy applied to every admin request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub client_id: String,
    pub request_timeout: Duration,
    pub retry_max: u32,
    pub retry_backoff: Duration,
    pub metadata_refresh_interval: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            client_id: "KafkaTopicView".to_owned(),
            request_timeout: Duration::from_secs(10),
            retry_max: 5,
            retry_backoff: Duration::from_secs(1),
            metadata_refresh_interval: Duration::from_secs(60),
        }
    }
}

impl ConnectionSettings {
    pub fn security_protocol(&self) -> SecurityProtocol {
        if self.tls.enabled() {
            SecurityProtocol::Ssl
        } else {
            SecurityProtocol::Plaintext
        }
    }
}

impl TryFrom<&ConnectionSettings> for ClientConfig {
    type Error = anyhow::Error;

    fn try_from(value: &ConnectionSettings) -> Result<Self, Self::Error> {
        if value.brokers.is_empty() {
            bail!("No brokers specified")
        }

        let mut config = ClientConfig::new();

        // https://raw.githubusercontent.com/confluentinc/librdkafka/master/CONFIGURATION.md
        let brokers_string = value.brokers.join(",");
        config
            .set("bootstrap.servers", brokers_string)
            .set("client.id", &value.client.client_id)
            .set("api.version.request", "true")
            .set("broker.version.fallback", &value.kafka_version)
            .set("socket.timeout.ms", millis(value.client.request_timeout))
            .set("retry.backoff.ms", millis(value.client.retry_backoff))
            .set(
                "topic.metadata.refresh.interval.ms",
                millis(value.client.metadata_refresh_interval),
            )
            .set("security.protocol", value.security_protocol().to_string());

        if value.tls.enabled() {
            if let Some(ca_file) = &value.tls.ca_file {
                config.set("ssl.ca.location", existing_path(ca_file, "TLS CA")?);
            }

            if let Some((cert_file, key_file)) = value.tls.client_identity() {
                config
                    .set(
                        "ssl.certificate.location",
                        existing_path(cert_file, "TLS client certificate")?,
                    )
                    .set("ssl.key.location", existing_path(key_file, "TLS client key")?);
            }

            if value.tls.insecure_skip_verify {
                config
                    .set("enable.ssl.certificate.verification", "false")
                    .set("ssl.endpoint.identification.algorithm", "none");
            }
        }

        if value.client_debug {
            config.set("debug", "all");
        } else if let Ok(value) = std::env::var("RD_KAFKA_DEBUG") {
            config.set("debug", value);
        }

        Ok(config)
    }
}

fn millis(duration: Duration) -> String {
    duration.as_millis().to_string()
}

fn existing_path(path: &Path, what: &str) -> Result<String, anyhow::Error> {
    if !path.is_file() {
        bail!("{what} file '{}' does not exist", path.display())
    }

    Ok(path.display().to_string())
}
