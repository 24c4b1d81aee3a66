//! # Onion Gateway
//!
//! Entry point: the authoritative nameserver for gateway domains, and an
//! operator tool resolving hostnames to the onion addresses they delegate to.

mod bootstrap;
mod server;

use bootstrap::{init_logging, load_config};
use clap::{Parser, Subcommand};
use onion_gateway_domain::CliOverrides;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "onion-gateway")]
#[command(version)]
#[command(about = "Onion Gateway nameserver and hostname-to-onion resolver")]
struct Cli {
    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long, global = true)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long, global = true)]
    bind: Option<String>,

    /// In-memory cache size for host->onion map (MB)
    #[arg(long, global = true)]
    cache_mb: Option<usize>,

    /// Addresses per A/AAAA answer
    #[arg(long, global = true)]
    answer_count: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the static zone as an authoritative DNS server
    Nameserver,

    /// Resolve hostnames to onion addresses (reads stdin when none are given)
    Resolve { hostnames: Vec<String> },
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            dns_port: self.dns_port,
            bind_address: self.bind.clone(),
            log_level: self.log_level.clone(),
            cache_mb: self.cache_mb,
            answer_count: self.answer_count,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let overrides = cli.overrides();

    let config = load_config(cli.config.as_deref(), overrides.clone())?;
    init_logging(&config);
    bootstrap::config::log_config(cli.config.as_deref(), &config);

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Shutdown signal received");
                    shutdown.cancel();
                }
                Err(e) => error!(error = %e, "Failed to listen for Ctrl-C"),
            }
        });
    }

    match cli.command {
        Command::Nameserver => {
            server::start_dns_server(&config, cli.config, overrides, shutdown).await?;
        }
        Command::Resolve { hostnames } => {
            server::run_resolver(&config, hostnames, shutdown).await?;
        }
    }

    info!("Onion Gateway stopped");
    Ok(())
}
