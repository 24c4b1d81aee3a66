use onion_gateway_domain::OnionAddress;

/// Counters reported by an [`OnionCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub bytes: usize,
    pub capacity_bytes: usize,
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
    pub evictions: u64,
    pub expirations: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Hostname -> onion map with per-entry expiry.
///
/// Shared by every connection handler, so all methods take `&self` and must be
/// safe under concurrent use. An entry past its TTL is never returned.
pub trait OnionCache: Send + Sync {
    fn get(&self, hostname: &str) -> Option<OnionAddress>;

    /// Insert or refresh; the entry expires `ttl_secs` from now.
    fn insert(&self, hostname: &str, onion: OnionAddress, ttl_secs: u32);

    /// Drop every expired entry, returning how many were removed.
    fn compact(&self) -> usize;

    fn stats(&self) -> CacheStats;
}
