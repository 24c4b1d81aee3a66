use onion_gateway_application::ports::OnionCache;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Periodically drops expired host->onion entries and logs cache stats.
///
/// Reads already skip expired entries; this only returns their memory early.
pub struct CacheCompactionJob {
    cache: Arc<dyn OnionCache>,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl CacheCompactionJob {
    pub fn new(cache: Arc<dyn OnionCache>) -> Self {
        Self {
            cache,
            interval_secs: 300,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// One compaction pass; returns the number of entries removed.
    pub fn run_once(&self) -> usize {
        let removed = self.cache.compact();
        let stats = self.cache.stats();

        if removed > 0 {
            info!(
                removed,
                entries = stats.entries,
                bytes = stats.bytes,
                capacity_bytes = stats.capacity_bytes,
                hit_rate = stats.hit_rate(),
                evictions = stats.evictions,
                "Cache compaction completed"
            );
        } else {
            debug!(entries = stats.entries, bytes = stats.bytes, "Cache compaction: nothing expired");
        }

        removed
    }

    pub async fn start(self: Arc<Self>) {
        info!(interval_secs = self.interval_secs, "Starting cache compaction job");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            // The first tick fires immediately; the cache is empty at startup.
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("CacheCompactionJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        self.run_once();
                    }
                }
            }
        });
    }
}
