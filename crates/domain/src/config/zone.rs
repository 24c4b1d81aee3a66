use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Static zone answered by the authoritative nameserver.
///
/// ```toml
/// [zone]
/// ipv4_proxies = ["192.0.2.10", "192.0.2.11"]
/// ipv6_proxies = ["2001:db8::10"]
/// nameservers = [".ns1.gateway.example.", ".ns2.gateway.example."]
/// answer_count = 2
///
/// [zone.domains]
/// "example.com." = "t3mny6lhnyku4wrd.onion"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ZoneConfig {
    #[serde(default)]
    pub ipv4_proxies: Vec<String>,

    #[serde(default)]
    pub ipv6_proxies: Vec<String>,

    /// Domain -> onion address, exact match only
    #[serde(default)]
    pub domains: BTreeMap<String, String>,

    /// Suffixes appended to an onion address to form delegated NS hostnames
    #[serde(default)]
    pub nameservers: Vec<String>,

    /// Maximum addresses per A/AAAA answer. Must be > 0.
    #[serde(default)]
    pub answer_count: usize,

    /// TTL placed on synthesized answers
    #[serde(default = "default_answer_ttl")]
    pub ttl: u32,
}

fn default_answer_ttl() -> u32 {
    600
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            ipv4_proxies: vec![],
            ipv6_proxies: vec![],
            domains: BTreeMap::new(),
            nameservers: vec![],
            answer_count: 0,
            ttl: default_answer_ttl(),
        }
    }
}
