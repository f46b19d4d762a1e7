//! Relay hub binary
//!
//! Run with: channel-relay --config session.json [--bind 0.0.0.0:8080]

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use channel_relay::{RelayServer, ServerConfig, SessionConfig};

#[derive(Parser, Debug)]
#[command(name = "channel-relay")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Session file with the secret and channel size tables
    #[arg(short, long, default_value = "session.json")]
    config: PathBuf,

    /// Address to listen on
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// Maximum simultaneous clients (at most 127)
    #[arg(long)]
    max_clients: Option<usize>,

    /// Log level when RUST_LOG is not set (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> channel_relay::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let session = SessionConfig::from_file(&args.config)?;
    tracing::info!(
        path = %args.config.display(),
        session_channels = ?session.session_channels,
        client_channels = ?session.client_channels,
        "Session loaded"
    );

    let mut config = ServerConfig::with_addr(args.bind);
    if let Some(max) = args.max_clients {
        config = config.max_clients(max);
    }

    let server = RelayServer::new(config, session)?;
    server
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}
