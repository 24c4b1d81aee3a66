use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::{Record, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio_util::sync::CancellationToken;

/// What the mock answers for one (name, type) question.
#[derive(Clone, Default)]
pub struct ScriptedAnswer {
    pub rcode: Option<ResponseCode>,
    pub answers: Vec<Record>,
    pub authority: Vec<Record>,
    pub additionals: Vec<Record>,
}

impl ScriptedAnswer {
    pub fn answers(records: Vec<Record>) -> Self {
        Self {
            answers: records,
            ..Self::default()
        }
    }

    pub fn referral(authority: Vec<Record>) -> Self {
        Self {
            authority,
            ..Self::default()
        }
    }

    pub fn with_glue(mut self, additionals: Vec<Record>) -> Self {
        self.additionals = additionals;
        self
    }

    pub fn rcode(rcode: ResponseCode) -> Self {
        Self {
            rcode: Some(rcode),
            ..Self::default()
        }
    }
}

#[derive(Default)]
struct Script {
    zone: HashMap<(String, RecordType), ScriptedAnswer>,
    truncate_udp: bool,
    wrong_id: bool,
    silent: bool,
    stall_tcp: bool,
}

struct Counters {
    udp_queries: AtomicUsize,
    tcp_queries: AtomicUsize,
    last_recursion_desired: Mutex<Option<bool>>,
}

/// Loopback DNS server answering from a fixed script over UDP and TCP.
///
/// Unknown questions get NXDOMAIN.
pub struct MockDnsServer {
    addr: SocketAddr,
    counters: Arc<Counters>,
    shutdown: CancellationToken,
}

pub struct MockDnsServerBuilder {
    script: Script,
}

impl MockDnsServerBuilder {
    pub fn answer(mut self, qname: &str, qtype: RecordType, answer: ScriptedAnswer) -> Self {
        self.script
            .zone
            .insert((qname.to_ascii_lowercase(), qtype), answer);
        self
    }

    /// UDP replies carry only the TC bit; TCP replies are complete.
    pub fn truncate_udp(mut self) -> Self {
        self.script.truncate_udp = true;
        self
    }

    /// Replies carry an ID different from the query's.
    pub fn wrong_id(mut self) -> Self {
        self.script.wrong_id = true;
        self
    }

    /// Reads queries and never replies.
    pub fn silent(mut self) -> Self {
        self.script.silent = true;
        self
    }

    /// TCP connections are accepted and read but left hanging.
    pub fn stall_tcp(mut self) -> Self {
        self.script.stall_tcp = true;
        self
    }

    pub async fn start(self) -> MockDnsServer {
        self.start_on(SocketAddr::from(([127, 0, 0, 1], 0))).await
    }

    /// Listen on `addr`, e.g. another loopback address sharing a port.
    pub async fn start_on(self, addr: SocketAddr) -> MockDnsServer {
        let udp = UdpSocket::bind(addr).await.unwrap();
        let addr = udp.local_addr().unwrap();
        let tcp = TcpListener::bind(addr).await.unwrap();

        let script = Arc::new(self.script);
        let counters = Arc::new(Counters {
            udp_queries: AtomicUsize::new(0),
            tcp_queries: AtomicUsize::new(0),
            last_recursion_desired: Mutex::new(None),
        });
        let shutdown = CancellationToken::new();

        {
            let script = Arc::clone(&script);
            let counters = Arc::clone(&counters);
            let shutdown = shutdown.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                loop {
                    tokio::select! {
                        _ = shutdown.cancelled() => break,
                        result = udp.recv_from(&mut buf) => {
                            let Ok((len, peer)) = result else { continue };
                            counters.udp_queries.fetch_add(1, Ordering::SeqCst);
                            if let Some(response) = respond(&script, &counters, &buf[..len], true) {
                                let _ = udp.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            });
        }

        {
            let script = Arc::clone(&script);
            let counters = Arc::clone(&counters);
            let shutdown = shutdown.clone();
            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = shutdown.cancelled() => break,
                        result = tcp.accept() => {
                            let Ok((mut stream, _)) = result else { continue };
                            let script = Arc::clone(&script);
                            let counters = Arc::clone(&counters);
                            tokio::spawn(async move {
                                let mut len_buf = [0u8; 2];
                                if stream.read_exact(&mut len_buf).await.is_err() {
                                    return;
                                }
                                let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
                                if stream.read_exact(&mut query).await.is_err() {
                                    return;
                                }
                                counters.tcp_queries.fetch_add(1, Ordering::SeqCst);
                                if script.stall_tcp {
                                    tokio::time::sleep(Duration::from_secs(10)).await;
                                    return;
                                }
                                if let Some(response) = respond(&script, &counters, &query, false) {
                                    let len = (response.len() as u16).to_be_bytes();
                                    let _ = stream.write_all(&len).await;
                                    let _ = stream.write_all(&response).await;
                                }
                            });
                        }
                    }
                }
            });
        }

        MockDnsServer {
            addr,
            counters,
            shutdown,
        }
    }
}

impl MockDnsServer {
    pub fn builder() -> MockDnsServerBuilder {
        MockDnsServerBuilder {
            script: Script::default(),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_queries(&self) -> usize {
        self.counters.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.counters.tcp_queries.load(Ordering::SeqCst)
    }

    pub fn total_queries(&self) -> usize {
        self.udp_queries() + self.tcp_queries()
    }

    pub fn last_recursion_desired(&self) -> Option<bool> {
        *self.counters.last_recursion_desired.lock().unwrap()
    }

    pub fn shutdown(self) {
        self.shutdown.cancel();
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn respond(script: &Script, counters: &Counters, query_bytes: &[u8], udp: bool) -> Option<Vec<u8>> {
    if script.silent {
        return None;
    }

    let query = Message::from_vec(query_bytes).ok()?;
    *counters.last_recursion_desired.lock().unwrap() = Some(query.recursion_desired());

    let id = if script.wrong_id {
        query.id().wrapping_add(1)
    } else {
        query.id()
    };

    let mut response = Message::new(id, MessageType::Response, OpCode::Query);
    response.set_recursion_desired(query.recursion_desired());
    for question in query.queries() {
        response.add_query(question.clone());
    }

    if udp && script.truncate_udp {
        response.set_truncated(true);
        return encode(&response);
    }

    let question = query.queries().first()?;
    let key = (
        question.name().to_utf8().to_ascii_lowercase(),
        question.query_type(),
    );

    match script.zone.get(&key) {
        Some(answer) => {
            response.set_response_code(answer.rcode.unwrap_or(ResponseCode::NoError));
            for record in &answer.answers {
                response.add_answer(record.clone());
            }
            for record in &answer.authority {
                response.add_name_server(record.clone());
            }
            for record in &answer.additionals {
                response.add_additional(record.clone());
            }
        }
        None => {
            response.set_response_code(ResponseCode::NXDomain);
        }
    }

    encode(&response)
}

fn encode(message: &Message) -> Option<Vec<u8>> {
    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);
    message.emit(&mut encoder).ok()?;
    Some(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_starts_on_ephemeral_port() {
        let server = MockDnsServer::builder().start().await;
        assert_ne!(server.addr().port(), 0);
        server.shutdown();
    }
}
