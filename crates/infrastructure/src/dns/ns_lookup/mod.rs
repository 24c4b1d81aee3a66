mod delegation;
mod direct;
mod upstream;

pub use delegation::DelegationNsLookup;
pub use direct::DirectNsLookup;
pub use upstream::RecursiveUpstream;

use crate::system::resolv_conf;
use onion_gateway_application::ports::NsLookup;
use onion_gateway_domain::config::{LookupStrategy, ResolverConfig};
use onion_gateway_domain::DomainError;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Builds the NS lookup strategy selected in `[resolver]`.
///
/// Upstream servers come from the config; when none are listed the system
/// resolvers from `/etc/resolv.conf` are used, then public fallbacks.
pub fn create_ns_lookup(config: &ResolverConfig) -> Result<Arc<dyn NsLookup>, DomainError> {
    let mut servers = config
        .upstream_addrs()
        .map_err(DomainError::Configuration)?;

    if servers.is_empty() {
        servers = resolv_conf::system_resolvers();
    }

    let timeout = Duration::from_millis(config.query_timeout_ms);
    let upstream = Arc::new(RecursiveUpstream::new(servers, timeout)?);

    info!(
        strategy = ?config.strategy,
        upstream = ?upstream.servers(),
        timeout_ms = config.query_timeout_ms,
        "NS lookup configured"
    );

    let lookup: Arc<dyn NsLookup> = match config.strategy {
        LookupStrategy::Direct => Arc::new(DirectNsLookup::new(upstream)),
        LookupStrategy::Delegation => Arc::new(DelegationNsLookup::new(upstream, timeout)),
    };

    Ok(lookup)
}
