//! election-dumper entry point.
//!
//! Resolves a gravity-chain height (directly, or from an epoch number via the
//! epoch-metadata RPC), fetches the committee's election result at that height
//! and writes one CSV row per vote to stdout. Logs go to stderr so the CSV
//! stream stays clean. Any failure is fatal.

mod address;
mod commands;

use clap::Parser;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(name = "election-dumper")]
#[command(about = "Export the committee's election result as CSV", long_about = None)]
struct Cli {
    /// Committee config paths in merge order (base -> overrides)
    #[arg(long = "config", default_value = "committee.yaml")]
    config_paths: Vec<String>,

    /// Chain epoch; resolved to its gravity-chain height (0 = unset)
    #[arg(long, default_value_t = 0)]
    epoch: u64,

    /// Gravity-chain height, used when --epoch is unset
    #[arg(long, default_value_t = 0)]
    height: u64,

    /// Epoch-metadata RPC base URL (overrides `endpoint` in config)
    #[arg(long)]
    endpoint: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let args = commands::dump::DumpArgs {
        config_paths: cli.config_paths,
        epoch: cli.epoch,
        height: cli.height,
        endpoint: cli.endpoint,
    };

    match commands::dump::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(cause = %format!("{e:#}"), "dump failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
