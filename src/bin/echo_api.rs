use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;

use finance_news::server::{run_server, DEFAULT_ADDR};

#[derive(Parser, Debug)]
#[command(name = "echo-api", about = "Echo API: POST /echo returns the posted text")]
struct Args {
    /// Address to listen on
    #[arg(long, env = "ECHO_ADDR", default_value = DEFAULT_ADDR)]
    addr: SocketAddr,
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

    run_server(args.addr)
        .await
        .with_context(|| format!("Echo API failed on {}", args.addr))
}
