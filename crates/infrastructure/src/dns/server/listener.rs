use super::handler::{StaticDnsHandler, MAX_UDP_RESPONSE};
use onion_gateway_domain::DomainError;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Receive buffer for UDP queries (EDNS clients may send up to 4096)
const UDP_RECV_BUFFER: usize = 4096;

/// Pause after a failed `accept` (e.g. out of file descriptors).
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Authoritative DNS server for the static zone over UDP and TCP.
pub struct DnsServer {
    handler: StaticDnsHandler,
    udp_socket: UdpSocket,
    tcp_listener: TcpListener,
    tcp_idle_timeout: Duration,
}

impl DnsServer {
    /// Bind UDP and TCP on `addr`. With port 0 the TCP listener takes the port
    /// the OS picked for UDP.
    pub async fn bind(
        addr: SocketAddr,
        handler: StaticDnsHandler,
        tcp_idle_timeout: Duration,
    ) -> Result<Self, DomainError> {
        let udp_socket = UdpSocket::bind(addr)
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to bind UDP {}: {}", addr, e)))?;
        let udp_addr = udp_socket
            .local_addr()
            .map_err(|e| DomainError::IoError(e.to_string()))?;
        info!(protocol = "UDP", bind_address = %udp_addr, "DNS server listening");

        let tcp_listener = TcpListener::bind(udp_addr)
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to bind TCP {}: {}", udp_addr, e)))?;
        info!(protocol = "TCP", bind_address = %udp_addr, "DNS server listening");

        Ok(Self {
            handler,
            udp_socket,
            tcp_listener,
            tcp_idle_timeout,
        })
    }

    pub fn udp_addr(&self) -> Result<SocketAddr, DomainError> {
        self.udp_socket
            .local_addr()
            .map_err(|e| DomainError::IoError(e.to_string()))
    }

    pub fn tcp_addr(&self) -> Result<SocketAddr, DomainError> {
        self.tcp_listener
            .local_addr()
            .map_err(|e| DomainError::IoError(e.to_string()))
    }

    /// Serve until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), DomainError> {
        let Self {
            handler,
            udp_socket,
            tcp_listener,
            tcp_idle_timeout,
        } = self;

        info!("DNS server ready to accept queries");

        tokio::select! {
            result = Self::run_udp(&handler, &udp_socket) => {
                error!(error = ?result, "UDP server stopped");
                result
            }
            result = Self::run_tcp(&handler, &tcp_listener, tcp_idle_timeout, shutdown.clone()) => {
                error!(error = ?result, "TCP server stopped");
                result
            }
            _ = shutdown.cancelled() => {
                info!("DNS server shutting down");
                Ok(())
            }
        }
    }

    async fn run_udp(handler: &StaticDnsHandler, socket: &UdpSocket) -> Result<(), DomainError> {
        let mut buf = vec![0u8; UDP_RECV_BUFFER];

        loop {
            let (len, peer) = match socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(e) => {
                    // ICMP port unreachable from an earlier reply shows up here on some platforms.
                    debug!(error = %e, "UDP receive error");
                    continue;
                }
            };

            let Some(response) = handler.handle_bytes(&buf[..len], Some(MAX_UDP_RESPONSE)) else {
                continue;
            };

            if let Err(e) = socket.send_to(&response, peer).await {
                warn!(peer = %peer, error = %e, "Failed to send UDP response");
            }
        }
    }

    async fn run_tcp(
        handler: &StaticDnsHandler,
        listener: &TcpListener,
        idle_timeout: Duration,
        shutdown: CancellationToken,
    ) -> Result<(), DomainError> {
        Self::accept_loop(move || listener.accept(), handler, idle_timeout, shutdown).await
    }

    /// Accept failures are logged and retried; they never stop the server.
    async fn accept_loop<A, F>(
        mut accept: A,
        handler: &StaticDnsHandler,
        idle_timeout: Duration,
        shutdown: CancellationToken,
    ) -> Result<(), DomainError>
    where
        A: FnMut() -> F,
        F: Future<Output = io::Result<(TcpStream, SocketAddr)>>,
    {
        loop {
            let (stream, peer) = match accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(error = %e, "TCP accept error");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            };

            let handler = handler.clone();
            let shutdown = shutdown.clone();

            tokio::spawn(async move {
                tokio::select! {
                    _ = Self::handle_tcp_connection(stream, peer, handler, idle_timeout) => {}
                    _ = shutdown.cancelled() => {}
                }
            });
        }
    }

    /// One connection may carry several length-prefixed queries.
    async fn handle_tcp_connection(
        mut stream: TcpStream,
        peer: SocketAddr,
        handler: StaticDnsHandler,
        idle_timeout: Duration,
    ) {
        loop {
            let mut len_buf = [0u8; 2];
            match timeout(idle_timeout, stream.read_exact(&mut len_buf)).await {
                Ok(Ok(_)) => {}
                Ok(Err(_)) | Err(_) => break,
            }

            let msg_len = u16::from_be_bytes(len_buf) as usize;
            let mut msg_buf = vec![0u8; msg_len];
            match timeout(idle_timeout, stream.read_exact(&mut msg_buf)).await {
                Ok(Ok(_)) => {}
                Ok(Err(_)) | Err(_) => break,
            }

            let Some(response) = handler.handle_bytes(&msg_buf, None) else {
                continue;
            };

            let Ok(len) = u16::try_from(response.len()) else {
                warn!(peer = %peer, size = response.len(), "Response too large for TCP");
                break;
            };

            let mut framed = Vec::with_capacity(response.len() + 2);
            framed.extend_from_slice(&len.to_be_bytes());
            framed.extend_from_slice(&response);

            if stream.write_all(&framed).await.is_err() {
                break;
            }
        }

        debug!(peer = %peer, "TCP connection closed");
    }
}
