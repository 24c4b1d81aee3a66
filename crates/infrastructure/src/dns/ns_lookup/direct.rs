use super::RecursiveUpstream;
use async_trait::async_trait;
use onion_gateway_application::ports::NsLookup;
use onion_gateway_domain::validators::normalize_fqdn;
use onion_gateway_domain::{DomainError, NsRecord, RecordType};
use std::sync::Arc;
use tracing::debug;

/// Asks the recursive resolver for the hostname's NS set.
pub struct DirectNsLookup {
    upstream: Arc<RecursiveUpstream>,
}

impl DirectNsLookup {
    pub fn new(upstream: Arc<RecursiveUpstream>) -> Self {
        Self { upstream }
    }
}

#[async_trait]
impl NsLookup for DirectNsLookup {
    async fn lookup_ns(&self, hostname: &str) -> Result<Vec<NsRecord>, DomainError> {
        let fqdn = normalize_fqdn(hostname);
        let response = self.upstream.query(&fqdn, &RecordType::NS).await?;

        if response.is_nxdomain() {
            debug!(hostname = %fqdn, "NXDOMAIN for NS query");
            return Ok(Vec::new());
        }

        Ok(response.ns_answers)
    }

    fn strategy_name(&self) -> &'static str {
        "direct"
    }
}
