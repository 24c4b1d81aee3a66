use crate::config::ZoneConfig;
use crate::onion::OnionAddress;
use crate::validators::normalize_fqdn;
use crate::DomainError;
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable snapshot of the zone the authoritative nameserver answers for.
///
/// Built once from [`ZoneConfig`] and shared read-only. Live reconfiguration
/// replaces the whole snapshot, never individual fields.
#[derive(Debug, Clone, Default)]
pub struct StaticDnsConfig {
    pub ipv4_proxies: Vec<Arc<str>>,
    pub ipv6_proxies: Vec<Arc<str>>,
    /// Keys are lowercase, dot-terminated FQDNs
    pub domain_to_onion: HashMap<Arc<str>, OnionAddress>,
    /// Each suffix starts and ends with a dot, e.g. `.ns1.gateway.example.`
    pub nameserver_suffixes: Vec<Arc<str>>,
    pub answer_count: usize,
    pub ttl: u32,
}

impl StaticDnsConfig {
    pub fn from_zone(zone: &ZoneConfig) -> Result<Self, DomainError> {
        let mut domain_to_onion = HashMap::with_capacity(zone.domains.len());
        for (domain, onion) in &zone.domains {
            let onion = OnionAddress::parse(onion).ok_or_else(|| {
                DomainError::Configuration(format!(
                    "{} maps to '{}', which is not an onion address",
                    domain, onion
                ))
            })?;
            domain_to_onion.insert(Arc::from(normalize_fqdn(domain)), onion);
        }

        Ok(Self {
            ipv4_proxies: zone.ipv4_proxies.iter().map(|p| Arc::from(p.trim())).collect(),
            ipv6_proxies: zone.ipv6_proxies.iter().map(|p| Arc::from(p.trim())).collect(),
            domain_to_onion,
            nameserver_suffixes: zone
                .nameservers
                .iter()
                .map(|s| Arc::from(normalize_suffix(s)))
                .collect(),
            answer_count: zone.answer_count,
            ttl: zone.ttl,
        })
    }

    pub fn onion_for(&self, domain: &str) -> Option<&OnionAddress> {
        self.domain_to_onion.get(domain)
    }
}

/// `ns1.gateway.example` -> `.ns1.gateway.example.`
fn normalize_suffix(suffix: &str) -> String {
    let fqdn = normalize_fqdn(suffix);
    if fqdn.starts_with('.') {
        fqdn
    } else {
        format!(".{}", fqdn)
    }
}
