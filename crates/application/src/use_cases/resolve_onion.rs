use onion_gateway_domain::validators::{normalize_fqdn, validate_hostname};
use onion_gateway_domain::{DomainError, NsRecord, OnionAddress};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::ports::{NsLookup, OnionCache};

const DEFAULT_TIMEOUT_MS: u64 = 2000;

/// Maps a clearnet hostname to the onion address its operator delegated to.
///
/// The operator publishes an NS record whose target contains the onion label
/// (e.g. `t3mny6lhnyku4wrd.onion.ns.example.com.`). Results are cached for the
/// TTL of that record.
///
/// Calls for different hostnames never wait on each other. Concurrent misses
/// for the same hostname may each perform their own lookup.
pub struct HostToOnionResolver {
    ns_lookup: Arc<dyn NsLookup>,
    cache: Arc<dyn OnionCache>,
    timeout: Duration,
}

impl HostToOnionResolver {
    pub fn new(ns_lookup: Arc<dyn NsLookup>, cache: Arc<dyn OnionCache>) -> Self {
        Self {
            ns_lookup,
            cache,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Deadline applied to the NS lookup of each cache miss.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache(&self) -> &Arc<dyn OnionCache> {
        &self.cache
    }

    #[instrument(skip(self), fields(strategy = self.ns_lookup.strategy_name()))]
    pub async fn resolve_to_onion(&self, hostname: &str) -> Result<OnionAddress, DomainError> {
        validate_hostname(hostname)?;
        let hostname = normalize_fqdn(hostname);

        if let Some(onion) = self.cache.get(&hostname) {
            debug!(hostname = %hostname, onion = %onion, "Onion cache hit");
            return Ok(onion);
        }

        let records = tokio::time::timeout(self.timeout, self.ns_lookup.lookup_ns(&hostname))
            .await
            .map_err(|_| DomainError::QueryTimeout)??;

        let (onion, ttl) = Self::select_onion(&hostname, &records)?;

        if ttl > 0 {
            self.cache.insert(&hostname, onion.clone(), ttl);
        }

        info!(hostname = %hostname, onion = %onion, ttl = ttl, "Resolved hostname to onion");
        Ok(onion)
    }

    /// First NS target carrying an onion label wins; operators publish one.
    fn select_onion(
        hostname: &str,
        records: &[NsRecord],
    ) -> Result<(OnionAddress, u32), DomainError> {
        if records.is_empty() {
            return Err(DomainError::NoRecords(hostname.to_string()));
        }

        records
            .iter()
            .find_map(|record| {
                OnionAddress::find_in(&record.nameserver).map(|onion| (onion, record.ttl))
            })
            .ok_or_else(|| {
                debug!(hostname = %hostname, records = records.len(), "No onion among NS records");
                DomainError::NoOnionFound(hostname.to_string())
            })
    }
}
