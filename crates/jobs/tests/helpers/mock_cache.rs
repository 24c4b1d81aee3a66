use onion_gateway_application::ports::{CacheStats, OnionCache};
use onion_gateway_domain::OnionAddress;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Cache fake that reports a fixed number of expired entries per pass.
pub struct CountingCache {
    compactions: AtomicUsize,
    expired_per_pass: usize,
}

impl CountingCache {
    pub fn new(expired_per_pass: usize) -> Self {
        Self {
            compactions: AtomicUsize::new(0),
            expired_per_pass,
        }
    }

    pub fn compactions(&self) -> usize {
        self.compactions.load(Ordering::SeqCst)
    }
}

impl OnionCache for CountingCache {
    fn get(&self, _hostname: &str) -> Option<OnionAddress> {
        None
    }

    fn insert(&self, _hostname: &str, _onion: OnionAddress, _ttl_secs: u32) {}

    fn compact(&self) -> usize {
        self.compactions.fetch_add(1, Ordering::SeqCst);
        self.expired_per_pass
    }

    fn stats(&self) -> CacheStats {
        CacheStats::default()
    }
}
