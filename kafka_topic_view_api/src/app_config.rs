use anyhow::{bail, Context};
use clap::Parser;
use config::Config;
use kafka_topic_view::connection_settings::{ClientSettings, ConnectionSettings, TlsSettings};
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::time::Duration;

/// Command line flags. Anything set here overrides the config file and environment.
#[derive(Parser, Debug, Default)]
#[command(name = "kafka_topic_view", version, about = "Serves a health view of Kafka topic partitions per broker")]
pub struct Cli {
    /// The address where the HTTP server runs
    #[arg(long)]
    pub listen_addr: Option<String>,

    /// Comma separated list of Kafka brokers to connect to
    #[arg(long)]
    pub bootstrap_server: Option<String>,

    /// The interval at which to fetch the new topic data, e.g. "1m" or "30s"
    #[arg(long)]
    pub fetch_interval: Option<humantime::Duration>,

    /// Version of the Kafka cluster
    #[arg(long)]
    pub kafka_version: Option<String>,

    /// File with the CA certificate for server authentication
    #[arg(long)]
    pub tls_ca_file: Option<PathBuf>,

    /// File with the client certificate for client authentication
    #[arg(long)]
    pub tls_cert_file: Option<PathBuf>,

    /// File with the key for client authentication
    #[arg(long)]
    pub tls_key_file: Option<PathBuf>,

    /// Skip TLS verification when connecting to the Kafka brokers. Use at your own risk!
    #[arg(long)]
    pub tls_insecure_skip_verify: bool,

    /// Turn on verbose logging
    #[arg(long)]
    pub verbose: bool,

    /// Turn on verbose logging in the Kafka client
    #[arg(long)]
    pub client_verbose: bool,

    /// Directory with the web UI files
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Config file name, extension optional
    #[arg(long, default_value = "appsettings")]
    pub config_file: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: String,
    pub bootstrap_server: String,
    pub kafka_version: String,
    #[serde(deserialize_with = "deserialize_duration")]
    pub fetch_interval: Duration,
    #[serde(default)]
    pub tls: TlsConfig,
    pub verbose: bool,
    pub client_verbose: bool,
    pub static_dir: PathBuf,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct TlsConfig {
    pub ca_file: Option<PathBuf>,
    pub cert_file: Option<PathBuf>,
    pub key_file: Option<PathBuf>,
    #[serde(default)]
    pub insecure_skip_verify: bool,
}

impl AppConfig {
    /// Layers, lowest precedence first: defaults, config file, `App__*` environment
    /// variables, command line flags.
    pub fn build(cli: &Cli) -> Result<Self, anyhow::Error> {
        let config = Config::builder()
            .set_default("listen_addr", "0.0.0.0:8080")?
            .set_default("bootstrap_server", "")?
            .set_default("kafka_version", "2.5.0")?
            .set_default("fetch_interval", "1m")?
            .set_default("verbose", false)?
            .set_default("client_verbose", false)?
            .set_default("static_dir", "./static")?
            .add_source(config::File::with_name(&cli.config_file).required(false))
            .add_source(config::Environment::with_prefix("App").separator("__"))
            .set_override_option("listen_addr", cli.listen_addr.clone())?
            .set_override_option("bootstrap_server", cli.bootstrap_server.clone())?
            .set_override_option("fetch_interval", cli.fetch_interval.as_ref().map(|d| d.to_string()))?
            .set_override_option("kafka_version", cli.kafka_version.clone())?
            .set_override_option("tls.ca_file", path_override(&cli.tls_ca_file))?
            .set_override_option("tls.cert_file", path_override(&cli.tls_cert_file))?
            .set_override_option("tls.key_file", path_override(&cli.tls_key_file))?
            .set_override_option("tls.insecure_skip_verify", cli.tls_insecure_skip_verify.then_some(true))?
            .set_override_option("verbose", cli.verbose.then_some(true))?
            .set_override_option("client_verbose", cli.client_verbose.then_some(true))?
            .set_override_option("static_dir", path_override(&cli.static_dir))?
            .build()
            .context("While building config")?;

        let deserialized_config: AppConfig = config
            .try_deserialize()
            .context("While deserializing config")?;

        if deserialized_config.brokers().is_empty() {
            bail!("No bootstrap servers specified. Please use the option --bootstrap-server to specify at least one Kafka broker!")
        }

        Ok(deserialized_config)
    }

    pub fn brokers(&self) -> Vec<String> {
        self.bootstrap_server
            .split(',')
            .map(str::trim)
            .filter(|broker| !broker.is_empty())
            .map(str::to_owned)
            .collect()
    }

    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            brokers: self.brokers(),
            kafka_version: self.kafka_version.clone(),
            tls: TlsSettings {
                ca_file: self.tls.ca_file.clone(),
                cert_file: self.tls.cert_file.clone(),
                key_file: self.tls.key_file.clone(),
                insecure_skip_verify: self.tls.insecure_skip_verify,
            },
            client: ClientSettings::default(),
            client_debug: self.client_verbose,
        }
    }
}

fn path_override(path: &Option<PathBuf>) -> Option<String> {
    path.as_ref().map(|path| path.display().to_string())
}

fn deserialize_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let value = String::deserialize(deserializer)?;
    humantime::parse_duration(&value).map_err(serde::de::Error::custom)
}
