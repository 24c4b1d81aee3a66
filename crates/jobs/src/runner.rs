use crate::CacheCompactionJob;
use std::sync::Arc;
use tracing::info;

/// Central orchestrator for background jobs.
///
/// ```rust,ignore
/// JobRunner::new()
///     .with_cache_compaction(CacheCompactionJob::new(cache).with_interval(300))
///     .start()
///     .await;
/// ```
pub struct JobRunner {
    cache_compaction: Option<CacheCompactionJob>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            cache_compaction: None,
        }
    }

    pub fn with_cache_compaction(mut self, job: CacheCompactionJob) -> Self {
        self.cache_compaction = Some(job);
        self
    }

    pub fn has_jobs(&self) -> bool {
        self.cache_compaction.is_some()
    }

    /// Start all registered background jobs.
    pub async fn start(self) {
        if !self.has_jobs() {
            info!("No background jobs registered");
            return;
        }

        info!("Starting background job runner");

        if let Some(job) = self.cache_compaction {
            Arc::new(job).start().await;
        }

        info!("All background jobs started");
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
