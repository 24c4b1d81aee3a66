use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::{RData, Record};
use onion_gateway_domain::{DomainError, NsRecord};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub id: u16,

    pub rcode: ResponseCode,

    pub truncated: bool,

    /// NS records from the answer section (recursive answers)
    pub ns_answers: Vec<NsRecord>,

    /// NS records from the authority section (referrals)
    pub ns_authority: Vec<NsRecord>,

    /// A/AAAA addresses from the answer section
    pub addresses: Vec<IpAddr>,

    /// Glue: A/AAAA records from the additional section, keyed by owner name
    pub glue: Vec<(Arc<str>, IpAddr)>,
}

impl DnsResponse {
    /// Usable delegation records: the answer section when it has any,
    /// otherwise the referral in the authority section.
    pub fn ns_records(&self) -> &[NsRecord] {
        if self.ns_answers.is_empty() {
            &self.ns_authority
        } else {
            &self.ns_answers
        }
    }

    /// Glue addresses for `nameserver`, compared case-insensitively.
    pub fn glue_for(&self, nameserver: &str) -> Vec<IpAddr> {
        self.glue
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(nameserver))
            .map(|(_, ip)| *ip)
            .collect()
    }

    pub fn is_nxdomain(&self) -> bool {
        self.rcode == ResponseCode::NXDomain
    }

    pub fn is_server_error(&self) -> bool {
        matches!(
            self.rcode,
            ResponseCode::ServFail | ResponseCode::Refused | ResponseCode::NotImp | ResponseCode::FormErr
        )
    }
}

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<DnsResponse, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::Lookup(format!("Failed to parse DNS response: {}", e))
        })?;

        let mut ns_answers = Vec::new();
        let mut addresses = Vec::new();

        for record in message.answers() {
            match record.data() {
                RData::A(a) => addresses.push(IpAddr::V4(a.0)),
                RData::AAAA(aaaa) => addresses.push(IpAddr::V6(aaaa.0)),
                RData::NS(_) => ns_answers.extend(Self::ns_record(record)),
                _ => {}
            }
        }

        let ns_authority: Vec<NsRecord> = message
            .name_servers()
            .iter()
            .filter_map(Self::ns_record)
            .collect();

        let glue = message
            .additionals()
            .iter()
            .filter_map(|record| {
                let ip = match record.data() {
                    RData::A(a) => IpAddr::V4(a.0),
                    RData::AAAA(aaaa) => IpAddr::V6(aaaa.0),
                    _ => return None,
                };
                Some((Arc::from(record.name().to_utf8().as_str()), ip))
            })
            .collect();

        let response = DnsResponse {
            id: message.id(),
            rcode: message.response_code(),
            truncated: message.truncated(),
            ns_answers,
            ns_authority,
            addresses,
            glue,
        };

        debug!(
            rcode = ?response.rcode,
            ns_answers = response.ns_answers.len(),
            ns_authority = response.ns_authority.len(),
            addresses = response.addresses.len(),
            truncated = response.truncated,
            "DNS response parsed"
        );

        Ok(response)
    }

    fn ns_record(record: &Record) -> Option<NsRecord> {
        match record.data() {
            RData::NS(ns) => Some(NsRecord::new(ns.0.to_utf8(), record.ttl())),
            _ => None,
        }
    }

    pub fn rcode_to_status(rcode: ResponseCode) -> &'static str {
        match rcode {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::FormErr => "FORMERR",
            _ => "UNKNOWN",
        }
    }
}
