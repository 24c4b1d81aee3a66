use crate::dns::forwarding::exchange::{remaining, share_of};
use crate::dns::forwarding::{DnsExchange, DnsResponse, ResponseParser};
use onion_gateway_domain::{DomainError, RecordType};
use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// The recursive resolvers the gateway leans on, tried in order.
pub struct RecursiveUpstream {
    servers: Vec<SocketAddr>,
    exchange: DnsExchange,
    timeout: Duration,
}

impl RecursiveUpstream {
    pub fn new(servers: Vec<SocketAddr>, timeout: Duration) -> Result<Self, DomainError> {
        if servers.is_empty() {
            return Err(DomainError::Configuration(
                "no upstream resolvers configured".to_string(),
            ));
        }
        Ok(Self {
            servers,
            exchange: DnsExchange::new(timeout),
            timeout,
        })
    }

    pub fn servers(&self) -> &[SocketAddr] {
        &self.servers
    }

    /// Recursive query bounded by the configured timeout.
    pub async fn query(
        &self,
        domain: &str,
        record_type: &RecordType,
    ) -> Result<DnsResponse, DomainError> {
        self.query_until(domain, record_type, Instant::now() + self.timeout)
            .await
    }

    /// Recursive query with failover: a server that errors, times out or
    /// answers SERVFAIL/REFUSED hands over to the next one. NXDOMAIN is a
    /// valid answer and is returned as is.
    ///
    /// Each server gets an equal slice of the time left before `deadline`,
    /// so a silent server cannot starve the ones after it.
    pub async fn query_until(
        &self,
        domain: &str,
        record_type: &RecordType,
        deadline: Instant,
    ) -> Result<DnsResponse, DomainError> {
        let mut last_error = None;

        for (index, server) in self.servers.iter().enumerate() {
            if remaining(deadline).is_zero() {
                last_error = Some(DomainError::QueryTimeout);
                break;
            }
            let servers_left = (self.servers.len() - index) as u32;
            let slot = share_of(deadline, servers_left);

            match self
                .exchange
                .query_until(*server, domain, record_type, true, slot)
                .await
            {
                Ok(response) if response.is_server_error() => {
                    let status = ResponseParser::rcode_to_status(response.rcode);
                    warn!(server = %server, domain = %domain, rcode = status, "Upstream refused query");
                    last_error = Some(DomainError::Lookup(format!(
                        "{} answered {} for {} {}",
                        server, status, record_type, domain
                    )));
                }
                Ok(response) => {
                    debug!(server = %server, domain = %domain, record_type = %record_type, "Upstream answered");
                    return Ok(response);
                }
                Err(e) => {
                    warn!(server = %server, domain = %domain, error = %e, "Upstream query failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DomainError::Lookup(format!("no upstream answered for {}", domain))
        }))
    }

    /// Addresses of `host`: A records first, AAAA if there are none.
    /// The A query gets half of the time left before `deadline`.
    pub async fn lookup_ip(&self, host: &str, deadline: Instant) -> Result<Vec<IpAddr>, DomainError> {
        let v4 = self
            .query_until(host, &RecordType::A, share_of(deadline, 2))
            .await?;
        if !v4.addresses.is_empty() {
            return Ok(v4.addresses);
        }

        let v6 = self.query_until(host, &RecordType::AAAA, deadline).await?;
        if v6.addresses.is_empty() {
            return Err(DomainError::Lookup(format!("No addresses for {}", host)));
        }
        Ok(v6.addresses)
    }
}
