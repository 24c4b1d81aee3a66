use onion_gateway_jobs::{CacheCompactionJob, JobRunner};
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;

mod helpers;
use helpers::CountingCache;

#[test]
fn test_run_once_reports_removed_entries() {
    let cache = Arc::new(CountingCache::new(3));
    let job = CacheCompactionJob::new(cache.clone());

    assert_eq!(job.run_once(), 3);
    assert_eq!(cache.compactions(), 1);
}

#[tokio::test]
async fn test_job_runs_periodically_until_cancelled() {
    let cache = Arc::new(CountingCache::new(0));
    let token = CancellationToken::new();

    let job = CacheCompactionJob::new(cache.clone())
        .with_interval(1)
        .with_cancellation(token.clone());
    Arc::new(job).start().await;

    sleep(Duration::from_millis(2500)).await;
    let after_run = cache.compactions();
    assert!(after_run >= 2, "expected at least 2 passes, got {}", after_run);

    token.cancel();
    sleep(Duration::from_millis(100)).await;
    let after_cancel = cache.compactions();

    sleep(Duration::from_millis(1500)).await;
    assert_eq!(cache.compactions(), after_cancel);
}

#[tokio::test]
async fn test_runner_without_jobs() {
    let runner = JobRunner::new();
    assert!(!runner.has_jobs());
    runner.start().await;
}

#[tokio::test]
async fn test_runner_starts_compaction() {
    let cache = Arc::new(CountingCache::new(0));
    let token = CancellationToken::new();

    let runner = JobRunner::new().with_cache_compaction(
        CacheCompactionJob::new(cache.clone())
            .with_interval(1)
            .with_cancellation(token.clone()),
    );
    assert!(runner.has_jobs());
    runner.start().await;

    sleep(Duration::from_millis(1300)).await;
    assert!(cache.compactions() >= 1);
    token.cancel();
}
