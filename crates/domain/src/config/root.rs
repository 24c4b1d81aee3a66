use super::{ConfigError, LoggingConfig, ResolverConfig, ServerConfig, ZoneConfig};
use crate::onion::OnionAddress;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::Path;

/// Root configuration, read from TOML.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub zone: ZoneConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values given on the command line. They take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
    pub cache_mb: Option<usize>,
    pub answer_count: Option<usize>,
}

impl Config {
    /// Load from `config_path` (or defaults when `None`) and apply CLI overrides.
    pub fn load(config_path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(cache_mb) = overrides.cache_mb {
            self.resolver.cache_mb = cache_mb;
        }
        if let Some(answer_count) = overrides.answer_count {
            self.zone.answer_count = answer_count;
        }
    }

    /// Structural checks. `answer_count` is left to the nameserver's own
    /// startup check so the resolver-only path can run without a zone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging.validate()?;
        if self.resolver.cache_mb == 0 {
            return Err(ConfigError::Validation(
                "resolver.cache_mb must be greater than 0".to_string(),
            ));
        }
        if self.resolver.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "resolver.query_timeout_ms must be greater than 0".to_string(),
            ));
        }
        self.resolver
            .upstream_addrs()
            .map_err(ConfigError::Validation)?;

        for proxy in &self.zone.ipv4_proxies {
            proxy.parse::<Ipv4Addr>().map_err(|_| {
                ConfigError::Validation(format!("zone.ipv4_proxies: '{}' is not IPv4", proxy))
            })?;
        }
        for proxy in &self.zone.ipv6_proxies {
            proxy.parse::<Ipv6Addr>().map_err(|_| {
                ConfigError::Validation(format!("zone.ipv6_proxies: '{}' is not IPv6", proxy))
            })?;
        }
        for (domain, onion) in &self.zone.domains {
            if OnionAddress::parse(onion).is_none() {
                return Err(ConfigError::Validation(format!(
                    "zone.domains: '{}' maps to '{}', which is not an onion address",
                    domain, onion
                )));
            }
        }
        Ok(())
    }
}
