use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct CacheMetrics {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub insertions: AtomicU64,
    /// Live entries dropped to stay within the byte budget
    pub evictions: AtomicU64,
    /// Entries dropped because their TTL ran out
    pub expirations: AtomicU64,
}

impl CacheMetrics {
    pub fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inserted(&self) {
        self.insertions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn evicted(&self, count: u64) {
        self.evictions.fetch_add(count, Ordering::Relaxed);
    }

    pub fn expired(&self, count: u64) {
        self.expirations.fetch_add(count, Ordering::Relaxed);
    }
}
