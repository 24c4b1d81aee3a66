use async_trait::async_trait;
use onion_gateway_domain::{DomainError, NsRecord};

/// Source of NS delegation records for a hostname.
///
/// Implementations differ in where they ask (the recursive resolver, or one
/// of the parent zone's authoritative servers); callers cannot tell them apart.
/// DNS answers arriving through this port are untrusted input.
#[async_trait]
pub trait NsLookup: Send + Sync {
    /// NS records in the order they were received.
    ///
    /// An empty vector is a valid answer; network failures and malformed
    /// responses are `DomainError::Lookup`.
    async fn lookup_ns(&self, hostname: &str) -> Result<Vec<NsRecord>, DomainError>;

    /// Short name for logs.
    fn strategy_name(&self) -> &'static str;
}
