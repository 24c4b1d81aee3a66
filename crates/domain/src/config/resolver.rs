use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// How NS records for a hostname are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupStrategy {
    /// Ask the recursive resolver for the hostname's NS set.
    Direct,
    /// Ask one of the parent zone's nameservers, non-recursively.
    #[default]
    Delegation,
}

/// Host-to-onion resolution configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub strategy: LookupStrategy,

    /// Recursive resolvers as `ip:port`. Empty means: read `/etc/resolv.conf`.
    #[serde(default)]
    pub upstream: Vec<String>,

    /// Deadline for one resolution, in milliseconds
    #[serde(default = "default_query_timeout")]
    pub query_timeout_ms: u64,

    /// In-memory cache size for the host->onion map (MB)
    #[serde(default = "default_cache_mb")]
    pub cache_mb: usize,

    /// Seconds between sweeps of expired cache entries (0 disables the job)
    #[serde(default = "default_compaction_interval")]
    pub cache_compaction_interval_secs: u64,
}

impl ResolverConfig {
    pub fn cache_bytes(&self) -> usize {
        self.cache_mb * 1024 * 1024
    }

    pub fn upstream_addrs(&self) -> Result<Vec<SocketAddr>, String> {
        self.upstream
            .iter()
            .map(|s| {
                s.parse::<SocketAddr>()
                    .map_err(|e| format!("invalid upstream '{}': {}", s, e))
            })
            .collect()
    }
}

fn default_query_timeout() -> u64 {
    2000
}

fn default_cache_mb() -> usize {
    10
}

fn default_compaction_interval() -> u64 {
    300
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            strategy: LookupStrategy::default(),
            upstream: vec![],
            query_timeout_ms: default_query_timeout(),
            cache_mb: default_cache_mb(),
            cache_compaction_interval_secs: default_compaction_interval(),
        }
    }
}
