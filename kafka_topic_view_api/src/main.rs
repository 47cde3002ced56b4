#![warn(unused_imports)]
#![deny(clippy::clone_on_copy)]
#![deny(forgetting_copy_types)]
#![deny(clippy::style)]

use anyhow::Context;
use clap::Parser;
use kafka_topic_view_api::app_config::{AppConfig, Cli};
use kafka_topic_view_api::startup::run_until_stopped;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    let config = AppConfig::build(&cli).context("While building app config")?;

    let default_level = if config.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let log_level = std::env::var("RUST_LOG").unwrap_or(default_level.to_string());

    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .parse_lossy(log_level);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(filter))
        .init();

    info!("App config: {config:?}");

    run_until_stopped(config).await?;

    Ok(())
}
