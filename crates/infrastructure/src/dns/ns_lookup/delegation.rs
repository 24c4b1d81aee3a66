use super::RecursiveUpstream;
use crate::dns::forwarding::exchange::share_of;
use crate::dns::forwarding::DnsExchange;
use async_trait::async_trait;
use onion_gateway_application::ports::NsLookup;
use onion_gateway_application::services::pick_one;
use onion_gateway_domain::validators::{normalize_fqdn, parent_domain};
use onion_gateway_domain::{DomainError, NsRecord, RecordType};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

const DNS_PORT: u16 = 53;

/// Walks one delegation step: find the parent zone's nameservers through the
/// recursive resolver, pick one at random and ask it, non-recursively, for
/// the hostname's NS records.
///
/// The whole walk shares one timeout: finding the parent's nameserver gets
/// at most two thirds of it and the final query gets whatever is left.
pub struct DelegationNsLookup {
    upstream: Arc<RecursiveUpstream>,
    exchange: DnsExchange,
    timeout: Duration,
    port: u16,
}

impl DelegationNsLookup {
    pub fn new(upstream: Arc<RecursiveUpstream>, timeout: Duration) -> Self {
        Self {
            upstream,
            exchange: DnsExchange::new(timeout),
            timeout,
            port: DNS_PORT,
        }
    }

    /// Port the parent's nameservers are queried on (53 unless overridden).
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    async fn parent_server(
        &self,
        parent: &str,
        deadline: Instant,
    ) -> Result<SocketAddr, DomainError> {
        let response = self
            .upstream
            .query_until(parent, &RecordType::NS, share_of(deadline, 3))
            .await
            .map_err(|e| DomainError::Lookup(format!("Unable to get {}'s NS: {}", parent, e)))?;

        let parent_ns = response.ns_records();
        let chosen = pick_one(parent_ns).ok_or_else(|| {
            DomainError::Lookup(format!("There is no NS records for {}", parent))
        })?;

        let glue = response.glue_for(&chosen.nameserver);
        let ip = match pick_one(&glue) {
            Some(ip) => *ip,
            None => {
                let addresses = self
                    .upstream
                    .lookup_ip(&chosen.nameserver, share_of(deadline, 2))
                    .await?;
                *pick_one(&addresses).ok_or_else(|| {
                    DomainError::Lookup(format!("No addresses for {}", chosen.nameserver))
                })?
            }
        };

        debug!(parent = %parent, nameserver = %chosen.nameserver, ip = %ip, "Parent nameserver chosen");
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[async_trait]
impl NsLookup for DelegationNsLookup {
    async fn lookup_ns(&self, hostname: &str) -> Result<Vec<NsRecord>, DomainError> {
        let fqdn = normalize_fqdn(hostname);
        let parent = parent_domain(&fqdn).map_err(|e| {
            DomainError::Lookup(format!("Can't get {}'s parent domain: {}", fqdn, e))
        })?;

        let deadline = Instant::now() + self.timeout;
        let server = self.parent_server(parent, deadline).await?;

        let response = self
            .exchange
            .query_until(server, &fqdn, &RecordType::NS, false, deadline)
            .await
            .map_err(|e| {
                DomainError::Lookup(format!("Unable to get {}'s NS from {}: {}", fqdn, server, e))
            })?;

        let records = response.ns_records().to_vec();
        if records.is_empty() {
            return Err(DomainError::Lookup(format!(
                "{} returned no NS records for {}",
                server, fqdn
            )));
        }

        Ok(records)
    }

    fn strategy_name(&self) -> &'static str {
        "delegation"
    }
}
