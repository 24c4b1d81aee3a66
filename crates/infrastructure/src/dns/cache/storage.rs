use super::{CacheMetrics, CachedOnion};
use dashmap::DashMap;
use onion_gateway_application::ports::{CacheStats, OnionCache};
use onion_gateway_domain::OnionAddress;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Minimum spacing between full expiry sweeps triggered by inserts.
const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

const NEVER_SWEPT: u64 = u64::MAX;

/// Hostname -> onion cache bounded by a byte budget.
///
/// Expired entries are dropped lazily when read. An insert that pushes the
/// cache over budget sweeps expired entries (at most once per sweep
/// interval), then evicts live entries from a random position until it fits
/// again. The compaction job only reclaims memory held by entries nobody
/// asks for anymore.
pub struct HostOnionCache {
    cache: DashMap<Arc<str>, CachedOnion, FxBuildHasher>,
    capacity_bytes: usize,
    used_bytes: AtomicUsize,
    metrics: CacheMetrics,
    created: Instant,
    last_sweep_ms: AtomicU64,
    sweep_interval: Duration,
}

impl HostOnionCache {
    pub fn new(capacity_bytes: usize) -> Self {
        info!(capacity_bytes = capacity_bytes, "Initializing host->onion cache");

        Self {
            cache: DashMap::with_hasher(FxBuildHasher::default()),
            capacity_bytes,
            used_bytes: AtomicUsize::new(0),
            metrics: CacheMetrics::default(),
            created: Instant::now(),
            last_sweep_ms: AtomicU64::new(NEVER_SWEPT),
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn used_bytes(&self) -> usize {
        self.used_bytes.load(AtomicOrdering::Relaxed)
    }

    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    fn remove_entry(&self, key: &str) -> bool {
        match self.cache.remove(key) {
            Some((_, removed)) => {
                self.used_bytes.fetch_sub(removed.size, AtomicOrdering::Relaxed);
                true
            }
            None => false,
        }
    }

    fn remove_if_expired(&self, key: &str, now: Instant) -> bool {
        match self.cache.remove_if(key, |_, entry| entry.is_expired_at(now)) {
            Some((_, removed)) => {
                self.used_bytes.fetch_sub(removed.size, AtomicOrdering::Relaxed);
                true
            }
            None => false,
        }
    }

    fn over_budget(&self) -> bool {
        self.used_bytes() > self.capacity_bytes
    }

    fn millis_since_created(&self, now: Instant) -> u64 {
        now.saturating_duration_since(self.created).as_millis() as u64
    }

    fn sweep_due(&self, now: Instant) -> bool {
        let last = self.last_sweep_ms.load(AtomicOrdering::Relaxed);
        last == NEVER_SWEPT
            || self.millis_since_created(now).saturating_sub(last)
                >= self.sweep_interval.as_millis() as u64
    }

    /// One pass from a random starting position, wrapping around once.
    fn evict_random_entries(&self, keep: &str) -> usize {
        let len = self.cache.len();
        if len == 0 {
            return 0;
        }

        let start = fastrand::usize(..len);
        let mut excess = self.used_bytes().saturating_sub(self.capacity_bytes);
        let mut victims: Vec<Arc<str>> = Vec::new();

        // Returns false once enough bytes are marked.
        let mut mark = |key: &Arc<str>, size: usize| {
            if excess > 0 && key.as_ref() != keep {
                excess = excess.saturating_sub(size);
                victims.push(Arc::clone(key));
            }
            excess > 0
        };

        for entry in self.cache.iter().skip(start) {
            if !mark(entry.key(), entry.value().size) {
                break;
            }
        }
        for entry in self.cache.iter().take(start) {
            if !mark(entry.key(), entry.value().size) {
                break;
            }
        }

        let evicted = victims.iter().filter(|key| self.remove_entry(key)).count();
        self.metrics.evicted(evicted as u64);
        evicted
    }

    fn make_room(&self, keep: &str) {
        if !self.over_budget() {
            return;
        }

        if self.sweep_due(Instant::now()) {
            let expired = self.compact();
            if expired > 0 {
                debug!(expired = expired, "Reclaimed expired entries on insert");
            }
        }

        // Concurrent inserts may refill the space; retry while progress is made.
        while self.over_budget() {
            if self.evict_random_entries(keep) == 0 {
                break;
            }
        }
    }
}

impl OnionCache for HostOnionCache {
    fn get(&self, hostname: &str) -> Option<OnionAddress> {
        let now = Instant::now();

        if let Some(entry) = self.cache.get(hostname) {
            if !entry.is_expired_at(now) {
                self.metrics.hit();
                return Some(entry.onion.clone());
            }
        } else {
            self.metrics.miss();
            return None;
        }

        // Expired: the read guard is gone, drop the entry lazily.
        if self.remove_if_expired(hostname, now) {
            self.metrics.expired(1);
        }
        self.metrics.miss();
        None
    }

    fn insert(&self, hostname: &str, onion: OnionAddress, ttl_secs: u32) {
        if ttl_secs == 0 {
            return;
        }

        let record = CachedOnion::new(hostname, onion, ttl_secs);
        if record.size > self.capacity_bytes {
            debug!(hostname = %hostname, size = record.size, "Entry larger than cache, not stored");
            return;
        }

        let size = record.size;
        let key: Arc<str> = Arc::from(hostname);
        if let Some(previous) = self.cache.insert(key, record) {
            self.used_bytes.fetch_sub(previous.size, AtomicOrdering::Relaxed);
        }
        self.used_bytes.fetch_add(size, AtomicOrdering::Relaxed);
        self.metrics.inserted();

        self.make_room(hostname);
    }

    fn compact(&self) -> usize {
        let now = Instant::now();
        self.last_sweep_ms
            .store(self.millis_since_created(now), AtomicOrdering::Relaxed);
        let expired: Vec<Arc<str>> = self
            .cache
            .iter()
            .filter(|entry| entry.value().is_expired_at(now))
            .map(|entry| Arc::clone(entry.key()))
            .collect();

        let removed = expired
            .iter()
            .filter(|key| self.remove_if_expired(key, now))
            .count();

        if removed > 0 {
            self.metrics.expired(removed as u64);
        }
        removed
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.cache.len(),
            bytes: self.used_bytes(),
            capacity_bytes: self.capacity_bytes,
            hits: self.metrics.hits.load(AtomicOrdering::Relaxed),
            misses: self.metrics.misses.load(AtomicOrdering::Relaxed),
            insertions: self.metrics.insertions.load(AtomicOrdering::Relaxed),
            evictions: self.metrics.evictions.load(AtomicOrdering::Relaxed),
            expirations: self.metrics.expirations.load(AtomicOrdering::Relaxed),
        }
    }
}
