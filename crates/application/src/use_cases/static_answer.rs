use arc_swap::ArcSwap;
use onion_gateway_domain::validators::normalize_fqdn;
use onion_gateway_domain::{DomainError, OnionAddress, RecordType, StaticDnsConfig};
use std::sync::Arc;
use tracing::{debug, info};

use crate::services::sample;

/// Answers A/AAAA/NS questions for the gateway's own zone from a static,
/// in-memory configuration.
///
/// A/AAAA answers are a random subset of the proxy pool, in random order.
/// NS answers delegate a mapped domain to `<onion><suffix>` nameservers so
/// that a [`HostToOnionResolver`](super::HostToOnionResolver) elsewhere can
/// discover the onion.
///
/// The configuration snapshot is swapped atomically on [`reload`](Self::reload);
/// a query in flight keeps the snapshot it started with.
pub struct StaticDnsResolver {
    config: ArcSwap<StaticDnsConfig>,
}

impl StaticDnsResolver {
    pub fn new(config: StaticDnsConfig) -> Self {
        Self {
            config: ArcSwap::from_pointee(config),
        }
    }

    /// Startup check. An unset answer count is fatal.
    pub fn start(&self) -> Result<(), DomainError> {
        let config = self.config.load();
        Self::validate(&config)?;
        info!(
            ipv4_proxies = config.ipv4_proxies.len(),
            ipv6_proxies = config.ipv6_proxies.len(),
            domains = config.domain_to_onion.len(),
            nameservers = config.nameserver_suffixes.len(),
            answer_count = config.answer_count,
            "Static resolver started"
        );
        Ok(())
    }

    /// Replace the whole configuration. The old snapshot stays in place if
    /// the new one is invalid.
    pub fn reload(&self, config: StaticDnsConfig) -> Result<(), DomainError> {
        Self::validate(&config)?;
        info!(
            domains = config.domain_to_onion.len(),
            answer_count = config.answer_count,
            "Static resolver configuration reloaded"
        );
        self.config.store(Arc::new(config));
        Ok(())
    }

    pub fn snapshot(&self) -> Arc<StaticDnsConfig> {
        self.config.load_full()
    }

    fn validate(config: &StaticDnsConfig) -> Result<(), DomainError> {
        if config.answer_count == 0 {
            return Err(DomainError::Configuration(
                "StaticResolver: set AnswerCount".to_string(),
            ));
        }
        Ok(())
    }

    /// Answer one question. The query class is not consulted.
    pub fn resolve(
        &self,
        domain: &str,
        record_type: RecordType,
        query_class: u16,
    ) -> Result<Vec<Arc<str>>, DomainError> {
        let config = self.config.load();
        debug!(domain = %domain, record_type = %record_type, query_class, "Static query");

        let proxies = match record_type {
            RecordType::A => &config.ipv4_proxies,
            RecordType::AAAA => &config.ipv6_proxies,
            RecordType::NS => {
                let domain = normalize_fqdn(domain);
                let onion = config
                    .onion_for(&domain)
                    .ok_or_else(|| DomainError::UnknownDomain(domain.clone()))?;
                return Self::nameservers_for(&config, onion);
            }
            other => return Err(DomainError::UnsupportedQueryType(other)),
        };

        if proxies.is_empty() {
            return Err(DomainError::NoProxies(record_type));
        }

        let k = Self::round(&config, proxies.len());
        Ok(sample(proxies.len(), k)
            .into_iter()
            .map(|i| Arc::clone(&proxies[i]))
            .collect())
    }

    /// `onion + suffix` for every configured nameserver suffix.
    pub fn make_nameservers(&self, onion: &OnionAddress) -> Result<Vec<Arc<str>>, DomainError> {
        Self::nameservers_for(&self.config.load(), onion)
    }

    fn nameservers_for(
        config: &StaticDnsConfig,
        onion: &OnionAddress,
    ) -> Result<Vec<Arc<str>>, DomainError> {
        if config.nameserver_suffixes.is_empty() {
            return Err(DomainError::NoNameservers(onion.to_string()));
        }
        Ok(config
            .nameserver_suffixes
            .iter()
            .map(|suffix| Arc::from(format!("{}{}", onion, suffix)))
            .collect())
    }

    /// Number of answers for a pool of `n`: never more than the pool or the configured count.
    pub fn round_answer_count(&self, n: usize) -> usize {
        Self::round(&self.config.load(), n)
    }

    fn round(config: &StaticDnsConfig, n: usize) -> usize {
        config.answer_count.min(n)
    }

    pub fn ttl(&self) -> u32 {
        self.config.load().ttl
    }
}
