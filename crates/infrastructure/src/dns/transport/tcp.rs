use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use onion_gateway_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

/// DNS over TCP transport (RFC 1035 section 4.2.2): each message is preceded
/// by its length as a big-endian u16.
pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    async fn exchange(&self, message_bytes: &[u8]) -> Result<Vec<u8>, DomainError> {
        let len = u16::try_from(message_bytes.len()).map_err(|_| {
            DomainError::Lookup(format!(
                "DNS message of {} bytes too large for TCP",
                message_bytes.len()
            ))
        })?;

        let mut stream = TcpStream::connect(self.server_addr).await.map_err(|e| {
            DomainError::Lookup(format!("Failed to connect to {}: {}", self.server_addr, e))
        })?;

        let mut framed = Vec::with_capacity(message_bytes.len() + 2);
        framed.extend_from_slice(&len.to_be_bytes());
        framed.extend_from_slice(message_bytes);

        stream.write_all(&framed).await.map_err(|e| {
            DomainError::Lookup(format!("Failed to send TCP query to {}: {}", self.server_addr, e))
        })?;

        let mut len_buf = [0u8; 2];
        stream.read_exact(&mut len_buf).await.map_err(|e| {
            DomainError::Lookup(format!(
                "Failed to read TCP response length from {}: {}",
                self.server_addr, e
            ))
        })?;

        let response_len = u16::from_be_bytes(len_buf) as usize;
        let mut response = vec![0u8; response_len];
        stream.read_exact(&mut response).await.map_err(|e| {
            DomainError::Lookup(format!(
                "Failed to read TCP response from {}: {}",
                self.server_addr, e
            ))
        })?;

        Ok(response)
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let bytes = tokio::time::timeout(timeout, self.exchange(message_bytes))
            .await
            .map_err(|_| {
                DomainError::Lookup(format!("Timeout on TCP query to {}", self.server_addr))
            })??;

        debug!(server = %self.server_addr, bytes_received = bytes.len(), "TCP response received");

        Ok(TransportResponse { bytes })
    }
}
