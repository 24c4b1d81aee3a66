use crate::dns_record::RecordType;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("NS lookup failed: {0}")]
    Lookup(String),

    #[error("No NS records for {0}")]
    NoRecords(String),

    #[error("No suitable NS records for {0}")]
    NoOnionFound(String),

    #[error("NS request of unknown domain: {0}")]
    UnknownDomain(String),

    #[error("No proxies for question of type {0}")]
    NoProxies(RecordType),

    #[error("No nameserver suffixes configured for {0}")]
    NoNameservers(String),

    #[error("Unknown question type: {0}")]
    UnsupportedQueryType(RecordType),

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Query timeout")]
    QueryTimeout,
}

impl DomainError {
    /// Upstream and transport failures may succeed on a later attempt;
    /// everything else needs a different input.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DomainError::Lookup(_) | DomainError::QueryTimeout | DomainError::IoError(_)
        )
    }

    /// Numeric DNS RCODE the authoritative responder answers with.
    pub fn response_code(&self) -> u16 {
        match self {
            DomainError::UnknownDomain(_) => RCODE_NXDOMAIN,
            DomainError::UnsupportedQueryType(_) => RCODE_NOTIMP,
            DomainError::NoProxies(_) | DomainError::NoNameservers(_) => RCODE_NOERROR,
            DomainError::InvalidDomainName(_) => RCODE_FORMERR,
            _ => RCODE_SERVFAIL,
        }
    }
}

pub const RCODE_NOERROR: u16 = 0;
pub const RCODE_FORMERR: u16 = 1;
pub const RCODE_SERVFAIL: u16 = 2;
pub const RCODE_NXDOMAIN: u16 = 3;
pub const RCODE_NOTIMP: u16 = 4;
