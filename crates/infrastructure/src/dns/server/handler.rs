use crate::dns::forwarding::{MessageBuilder, RecordTypeMapper};
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA, NS};
use hickory_proto::rr::{Name, RData, Record};
use onion_gateway_application::use_cases::StaticDnsResolver;
use onion_gateway_domain::errors::{
    RCODE_FORMERR, RCODE_NOERROR, RCODE_NOTIMP, RCODE_NXDOMAIN,
};
use onion_gateway_domain::{DnsQuery, DomainError, RecordType};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Largest response sent over plain UDP (RFC 1035 section 4.2.1).
pub const MAX_UDP_RESPONSE: usize = 512;

/// Turns wire queries into authoritative answers from the static zone.
#[derive(Clone)]
pub struct StaticDnsHandler {
    resolver: Arc<StaticDnsResolver>,
}

impl StaticDnsHandler {
    pub fn new(resolver: Arc<StaticDnsResolver>) -> Self {
        Self { resolver }
    }

    /// Decode, answer and encode one query.
    ///
    /// Returns `None` for packets that do not decode as a DNS query; those are
    /// dropped. With `max_size` set (UDP) an oversized answer is replaced by
    /// an empty one carrying the TC bit.
    pub fn handle_bytes(&self, query_bytes: &[u8], max_size: Option<usize>) -> Option<Vec<u8>> {
        let query = match Message::from_vec(query_bytes) {
            Ok(query) if query.message_type() == MessageType::Query => query,
            Ok(_) => {
                debug!("Ignoring DNS message that is not a query");
                return None;
            }
            Err(e) => {
                debug!(error = %e, len = query_bytes.len(), "Dropping malformed DNS packet");
                return None;
            }
        };

        let response = self.build_response(&query);
        let bytes = Self::encode(&response)?;

        match max_size {
            Some(limit) if bytes.len() > limit => {
                debug!(size = bytes.len(), limit = limit, "Response truncated for UDP");
                let mut truncated = Self::response_header(&query);
                truncated.set_authoritative(true);
                truncated.set_truncated(true);
                Self::encode(&truncated)
            }
            _ => Some(bytes),
        }
    }

    /// Authoritative response to `query`; only the first question is answered.
    pub fn build_response(&self, query: &Message) -> Message {
        let mut response = Self::response_header(query);

        if query.op_code() != OpCode::Query {
            response.set_response_code(ResponseCode::NotImp);
            return response;
        }

        let Some(question) = query.queries().first() else {
            response.set_response_code(ResponseCode::FormErr);
            return response;
        };

        response.set_authoritative(true);

        let dns_query = DnsQuery::new(
            question.name().to_utf8(),
            RecordTypeMapper::from_hickory(question.query_type()),
        )
        .with_class(u16::from(question.query_class()));
        let domain = &dns_query.domain;
        let record_type = dns_query.record_type;

        match self.resolver.resolve(domain, record_type, dns_query.query_class) {
            Ok(values) => {
                let ttl = self.resolver.ttl();
                for value in values.iter() {
                    match Self::answer_record(question, record_type, value, ttl) {
                        Some(record) => {
                            response.add_answer(record);
                        }
                        None => warn!(domain = %domain, value = %value, "Unencodable zone value skipped"),
                    }
                }
                debug!(domain = %domain, record_type = %record_type, answers = values.len(), "Static answer");
            }
            Err(e) => {
                debug!(domain = %domain, record_type = %record_type, error = %e, "Static query failed");
                response.set_response_code(Self::response_code(&e));
            }
        }

        response
    }

    fn response_header(query: &Message) -> Message {
        let mut response = Message::new(query.id(), MessageType::Response, query.op_code());
        response.set_recursion_desired(query.recursion_desired());
        response.set_recursion_available(false);
        for question in query.queries() {
            response.add_query(question.clone());
        }
        response
    }

    fn answer_record(
        question: &Query,
        record_type: RecordType,
        value: &str,
        ttl: u32,
    ) -> Option<Record> {
        let rdata = match record_type {
            RecordType::A => RData::A(A(Ipv4Addr::from_str(value).ok()?)),
            RecordType::AAAA => RData::AAAA(AAAA(Ipv6Addr::from_str(value).ok()?)),
            RecordType::NS => RData::NS(NS(Name::from_str(value).ok()?)),
            RecordType::Other(_) => return None,
        };
        Some(Record::from_rdata(question.name().clone(), ttl, rdata))
    }

    fn response_code(error: &DomainError) -> ResponseCode {
        match error.response_code() {
            RCODE_NOERROR => ResponseCode::NoError,
            RCODE_FORMERR => ResponseCode::FormErr,
            RCODE_NXDOMAIN => ResponseCode::NXDomain,
            RCODE_NOTIMP => ResponseCode::NotImp,
            _ => ResponseCode::ServFail,
        }
    }

    fn encode(message: &Message) -> Option<Vec<u8>> {
        match MessageBuilder::serialize_message(message) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(error = %e, "Failed to encode DNS response");
                None
            }
        }
    }
}
