use onion_gateway_domain::{CliOverrides, Config, StaticDnsConfig};
use tracing::info;

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;
    Ok(config)
}

pub fn log_config(config_path: Option<&str>, config: &Config) {
    info!(
        config_file = config_path.unwrap_or("default"),
        dns_port = config.server.dns_port,
        bind = %config.server.bind_address,
        strategy = ?config.resolver.strategy,
        cache_mb = config.resolver.cache_mb,
        zone_domains = config.zone.domains.len(),
        "Configuration loaded"
    );
}

/// Re-read the file and build a fresh zone snapshot from it.
pub fn load_zone(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<StaticDnsConfig> {
    let config = load_config(config_path, cli_overrides)?;
    Ok(StaticDnsConfig::from_zone(&config.zone)?)
}
