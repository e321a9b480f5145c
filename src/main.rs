//! # Contribution Dashboard Server (`dashboard-server`)
//!
//! Serves the PR dashboard page and a read-only JSON API over the
//! contribution history file.
//!
//! ## Examples
//!
//! ```bash
//! # Start on the default port (8081)
//! dashboard-server
//!
//! # Start on port 3000 with a specific data file
//! dashboard-server -p 3000 --data-file ./shared/contribution-history.json
//! ```

use clap::Parser;
use std::path::PathBuf;

use contrib_dashboard::config::{DashboardConfig, DEFAULT_PORT};
use contrib_dashboard::server;

/// Contribution Dashboard Server: serves the PR dashboard and its JSON API.
#[derive(Parser)]
#[command(name = "dashboard-server", version)]
struct Cli {
    /// Port to run the server on (1-65535).
    #[arg(short, long, default_value_t = DEFAULT_PORT, allow_negative_numbers = true)]
    port: i64,

    /// Path to the contribution history JSON file.
    #[arg(long)]
    data_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = DashboardConfig::from_cli(cli.port, cli.data_file)?;

    server::run_server(config).await
}
