use crate::bootstrap::load_zone;
use onion_gateway_application::use_cases::StaticDnsResolver;
use onion_gateway_domain::{CliOverrides, Config, StaticDnsConfig};
use onion_gateway_infrastructure::dns::{DnsServer, StaticDnsHandler};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Run the authoritative nameserver until `shutdown` fires.
pub async fn start_dns_server(
    config: &Config,
    config_path: Option<String>,
    cli_overrides: CliOverrides,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let zone = StaticDnsConfig::from_zone(&config.zone)?;
    let resolver = Arc::new(StaticDnsResolver::new(zone));
    resolver.start()?;

    let socket_addr = SocketAddr::from_str(&config.server.listen_address())?;
    info!(bind_address = %socket_addr, "Starting DNS server");

    let server = DnsServer::bind(
        socket_addr,
        StaticDnsHandler::new(Arc::clone(&resolver)),
        Duration::from_secs(config.server.tcp_idle_timeout_secs),
    )
    .await?;

    spawn_reload_on_hangup(resolver, config_path, cli_overrides, shutdown.clone());

    server.run(shutdown).await?;
    Ok(())
}

#[cfg(unix)]
fn spawn_reload_on_hangup(
    resolver: Arc<StaticDnsResolver>,
    config_path: Option<String>,
    cli_overrides: CliOverrides,
    shutdown: CancellationToken,
) {
    use tokio::signal::unix::{signal, SignalKind};

    let Some(path) = config_path else {
        info!("No config file given, SIGHUP reload disabled");
        return;
    };

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(stream) => stream,
        Err(e) => {
            error!(error = %e, "Cannot install SIGHUP handler, reload disabled");
            return;
        }
    };

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                received = hangup.recv() => {
                    if received.is_none() {
                        break;
                    }
                    info!(config_file = %path, "SIGHUP received, reloading zone");
                    let reloaded = load_zone(Some(&path), cli_overrides.clone())
                        .and_then(|zone| resolver.reload(zone).map_err(anyhow::Error::from));
                    match reloaded {
                        Ok(()) => info!("Zone reloaded"),
                        Err(e) => error!(error = %e, "Zone reload failed, keeping current zone"),
                    }
                }
            }
        }
    });
}

#[cfg(not(unix))]
fn spawn_reload_on_hangup(
    _resolver: Arc<StaticDnsResolver>,
    _config_path: Option<String>,
    _cli_overrides: CliOverrides,
    _shutdown: CancellationToken,
) {
}
