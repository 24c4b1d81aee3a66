use super::RecordType;
use std::sync::Arc;

/// DNS class IN.
pub const CLASS_IN: u16 = 1;

/// DNS query (domain + record type + class).
/// Uses `Arc<str>` so the domain can be shared between responder and resolver without copying.
#[derive(Debug, Clone)]
pub struct DnsQuery {
    pub domain: Arc<str>,
    pub record_type: RecordType,
    pub query_class: u16,
}

impl DnsQuery {
    pub fn new(domain: impl Into<Arc<str>>, record_type: RecordType) -> Self {
        Self {
            domain: domain.into(),
            record_type,
            query_class: CLASS_IN,
        }
    }

    pub fn with_class(mut self, query_class: u16) -> Self {
        self.query_class = query_class;
        self
    }
}
