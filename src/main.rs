use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use finance_news::config::{Config, Overrides};
use finance_news::ingest::Ingestor;
use finance_news::store::{MemoryStore, ObjectStore, S3Store};

#[derive(Parser, Debug)]
#[command(
    name = "ingest",
    about = "Fetch financial news feeds and store new entries as JSON in S3"
)]
struct Args {
    /// Optional TOML config file
    #[arg(long, env = "INGEST_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Comma-separated feed URLs
    #[arg(long, env = "FEEDS")]
    feeds: Option<String>,

    /// Destination bucket
    #[arg(long, env = "S3_BUCKET")]
    bucket: Option<String>,

    /// Bucket region
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Custom S3-compatible endpoint URL
    #[arg(long, env = "S3_ENDPOINT")]
    endpoint_url: Option<String>,

    /// Run the pipeline against an in-memory store instead of S3
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let base = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config file '{}'", path.display()))?,
        None => Config::default(),
    };
    let config = base.with_overrides(Overrides {
        feeds: args.feeds,
        bucket: args.bucket,
        region: args.region,
        endpoint_url: args.endpoint_url,
    });

    if config.feeds.is_empty() {
        tracing::warn!("No feeds configured, nothing to do");
        return Ok(());
    }

    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .build()
        .context("Failed to build HTTP client")?;

    let store: Box<dyn ObjectStore> = if args.dry_run {
        tracing::info!("Dry run: entries are kept in memory, S3 is not touched");
        Box::new(MemoryStore::new())
    } else {
        tracing::info!(bucket = %config.bucket, region = %config.region, "Using S3 store");
        Box::new(S3Store::connect(&config).await)
    };

    Ingestor::new(&client, &*store)
        .run(&config.feeds)
        .await;

    Ok(())
}
