use onion_gateway_domain::OnionAddress;
use std::time::{Duration, Instant};

/// Bookkeeping bytes charged per entry on top of key and value text.
pub const ENTRY_OVERHEAD: usize = 64;

#[derive(Debug, Clone)]
pub struct CachedOnion {
    pub onion: OnionAddress,
    pub expires_at: Instant,
    /// Bytes charged against the cache budget
    pub size: usize,
}

impl CachedOnion {
    pub fn new(hostname: &str, onion: OnionAddress, ttl_secs: u32) -> Self {
        let size = Self::charge(hostname, &onion);
        Self {
            onion,
            expires_at: Instant::now() + Duration::from_secs(u64::from(ttl_secs)),
            size,
        }
    }

    pub fn charge(hostname: &str, onion: &OnionAddress) -> usize {
        hostname.len() + onion.as_str().len() + ENTRY_OVERHEAD
    }

    #[inline]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
