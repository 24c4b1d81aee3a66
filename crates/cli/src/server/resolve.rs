use onion_gateway_application::use_cases::HostToOnionResolver;
use onion_gateway_domain::Config;
use onion_gateway_infrastructure::dns::{create_ns_lookup, HostOnionCache};
use onion_gateway_jobs::{CacheCompactionJob, JobRunner};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Resolve each hostname to its onion address and print the result.
///
/// With no hostnames given, names are read from stdin one per line until EOF,
/// sharing one cache.
pub async fn run_resolver(
    config: &Config,
    hostnames: Vec<String>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let ns_lookup = create_ns_lookup(&config.resolver)?;
    let cache = Arc::new(HostOnionCache::new(config.resolver.cache_bytes()));
    let resolver = HostToOnionResolver::new(ns_lookup, cache.clone())
        .with_timeout(Duration::from_millis(config.resolver.query_timeout_ms));

    let mut failures = 0usize;

    if !hostnames.is_empty() {
        for hostname in &hostnames {
            if !resolve_and_print(&resolver, hostname).await {
                failures += 1;
            }
        }
    } else {
        let mut runner = JobRunner::new();
        if config.resolver.cache_compaction_interval_secs > 0 {
            runner = runner.with_cache_compaction(
                CacheCompactionJob::new(cache)
                    .with_interval(config.resolver.cache_compaction_interval_secs)
                    .with_cancellation(shutdown.clone()),
            );
        }
        runner.start().await;

        info!("Reading hostnames from stdin");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = tokio::select! {
                _ = shutdown.cancelled() => break,
                line = lines.next_line() => line?,
            };
            let Some(line) = line else { break };
            let hostname = line.trim();
            if hostname.is_empty() || hostname.starts_with('#') {
                continue;
            }
            if !resolve_and_print(&resolver, hostname).await {
                failures += 1;
            }
        }
        shutdown.cancel();
    }

    if failures > 0 {
        anyhow::bail!("{} hostname(s) could not be resolved", failures);
    }
    Ok(())
}

async fn resolve_and_print(resolver: &HostToOnionResolver, hostname: &str) -> bool {
    match resolver.resolve_to_onion(hostname).await {
        Ok(onion) => {
            println!("{} -> {}", hostname, onion);
            true
        }
        Err(e) => {
            eprintln!("{}: {}", hostname, e);
            false
        }
    }
}
