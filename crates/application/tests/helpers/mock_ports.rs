use async_trait::async_trait;
use onion_gateway_application::ports::{CacheStats, NsLookup, OnionCache};
use onion_gateway_domain::{DomainError, NsRecord, OnionAddress};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

// ============================================================================
// Mock NsLookup
// ============================================================================

#[derive(Clone)]
enum Behaviour {
    Records(Vec<NsRecord>),
    Fail(String),
    Hang,
}

/// Scripted NS lookup that counts how often it was asked.
#[derive(Clone)]
pub struct MockNsLookup {
    behaviour: Behaviour,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockNsLookup {
    pub fn returning(records: Vec<NsRecord>) -> Self {
        Self {
            behaviour: Behaviour::Records(records),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// NS names with a shared TTL.
    pub fn with_names(names: &[&str], ttl: u32) -> Self {
        Self::returning(names.iter().map(|n| NsRecord::new(*n, ttl)).collect())
    }

    pub fn empty() -> Self {
        Self::returning(vec![])
    }

    pub fn failing(message: &str) -> Self {
        Self {
            behaviour: Behaviour::Fail(message.to_string()),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn hanging() -> Self {
        Self {
            behaviour: Behaviour::Hang,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NsLookup for MockNsLookup {
    async fn lookup_ns(&self, _hostname: &str) -> Result<Vec<NsRecord>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.behaviour {
            Behaviour::Records(records) => Ok(records.clone()),
            Behaviour::Fail(message) => Err(DomainError::Lookup(message.clone())),
            Behaviour::Hang => std::future::pending().await,
        }
    }

    fn strategy_name(&self) -> &'static str {
        "mock"
    }
}

// ============================================================================
// Mock OnionCache
// ============================================================================

/// Unbounded map with real expiry, enough to observe resolver behaviour.
#[derive(Default)]
pub struct MockOnionCache {
    entries: Mutex<HashMap<String, (OnionAddress, Instant)>>,
    insertions: AtomicUsize,
}

impl MockOnionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn insertions(&self) -> usize {
        self.insertions.load(Ordering::SeqCst)
    }

    pub fn contains(&self, hostname: &str) -> bool {
        self.entries.lock().unwrap().contains_key(hostname)
    }
}

impl OnionCache for MockOnionCache {
    fn get(&self, hostname: &str) -> Option<OnionAddress> {
        let entries = self.entries.lock().unwrap();
        entries
            .get(hostname)
            .filter(|(_, expires_at)| Instant::now() < *expires_at)
            .map(|(onion, _)| onion.clone())
    }

    fn insert(&self, hostname: &str, onion: OnionAddress, ttl_secs: u32) {
        self.insertions.fetch_add(1, Ordering::SeqCst);
        let expires_at = Instant::now() + Duration::from_secs(u64::from(ttl_secs));
        self.entries
            .lock()
            .unwrap()
            .insert(hostname.to_string(), (onion, expires_at));
    }

    fn compact(&self) -> usize {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        let now = Instant::now();
        entries.retain(|_, (_, expires_at)| now < *expires_at);
        before - entries.len()
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            ..Default::default()
        }
    }
}
