use super::{DnsResponse, MessageBuilder, ResponseParser};
use crate::dns::transport::Transport;
use onion_gateway_domain::{DomainError, RecordType};
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tracing::debug;

/// Time left before `deadline`, zero once it has passed.
pub fn remaining(deadline: Instant) -> Duration {
    deadline.saturating_duration_since(Instant::now())
}

/// Deadline for one of `parts` equal slices of the time left before
/// `deadline`. Whatever a slice does not use stays available to later ones.
pub fn share_of(deadline: Instant, parts: u32) -> Instant {
    Instant::now() + remaining(deadline) / parts.max(1)
}

/// One question/answer round trip against a single server.
///
/// UDP first; a truncated answer is repeated over TCP within what is left
/// of the same deadline.
#[derive(Debug, Clone, Copy)]
pub struct DnsExchange {
    timeout: Duration,
}

impl DnsExchange {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Round trip bounded by this exchange's own timeout.
    pub async fn query(
        &self,
        server: SocketAddr,
        domain: &str,
        record_type: &RecordType,
        recursion_desired: bool,
    ) -> Result<DnsResponse, DomainError> {
        self.query_until(
            server,
            domain,
            record_type,
            recursion_desired,
            Instant::now() + self.timeout,
        )
        .await
    }

    /// Round trip that must finish by `deadline`, TCP retry included.
    pub async fn query_until(
        &self,
        server: SocketAddr,
        domain: &str,
        record_type: &RecordType,
        recursion_desired: bool,
        deadline: Instant,
    ) -> Result<DnsResponse, DomainError> {
        let budget = remaining(deadline);
        if budget.is_zero() {
            return Err(DomainError::QueryTimeout);
        }

        let (id, query_bytes) =
            MessageBuilder::build_query_with_id(domain, record_type, recursion_desired)?;

        let udp = Transport::udp(server);
        let transport_response = udp.send(&query_bytes, budget).await?;
        let response = Self::checked(id, server, transport_response.bytes)?;

        if !response.truncated {
            return Ok(response);
        }

        let left = remaining(deadline);
        if left.is_zero() {
            debug!(server = %server, domain = %domain, "Response truncated with no time left for TCP");
            return Err(DomainError::QueryTimeout);
        }

        debug!(server = %server, domain = %domain, remaining_ms = left.as_millis() as u64, "Response truncated (TC bit), retrying via TCP");

        let tcp = Transport::tcp(server);
        let tcp_response = tcp.send(&query_bytes, left).await?;
        Self::checked(id, server, tcp_response.bytes)
    }

    fn checked(id: u16, server: SocketAddr, bytes: Vec<u8>) -> Result<DnsResponse, DomainError> {
        let response = ResponseParser::parse(&bytes)?;
        if response.id != id {
            return Err(DomainError::Lookup(format!(
                "Response ID mismatch from {}: expected {}, got {}",
                server, id, response.id
            )));
        }
        Ok(response)
    }
}
