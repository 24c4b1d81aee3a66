use onion_gateway_application::use_cases::HostToOnionResolver;
use onion_gateway_domain::{DomainError, NsRecord};
use std::sync::Arc;
use std::time::Duration;

mod helpers;
use helpers::{MockNsLookup, MockOnionCache};

const ONION_NS: &str = "t3mny6lhnyku4wrd.onion.ns.com";
const ONION: &str = "t3mny6lhnyku4wrd.onion";

fn resolver_with(lookup: &MockNsLookup, cache: &Arc<MockOnionCache>) -> HostToOnionResolver {
    HostToOnionResolver::new(Arc::new(lookup.clone()), cache.clone())
}

// ============================================================================
// Resolution outcomes
// ============================================================================

#[tokio::test]
async fn test_resolves_onion_from_ns_record() {
    let lookup = MockNsLookup::with_names(&[ONION_NS], 100);
    let cache = Arc::new(MockOnionCache::new());
    let resolver = resolver_with(&lookup, &cache);

    let onion = resolver.resolve_to_onion("example.com").await.unwrap();

    assert_eq!(onion.as_str(), ONION);
    assert_eq!(lookup.calls(), 1);
    assert!(cache.contains("example.com."));
}

#[tokio::test]
async fn test_first_matching_nameserver_wins() {
    let lookup = MockNsLookup::returning(vec![
        NsRecord::new("ns1.example.com.", 300),
        NsRecord::new("aaaaaaaaaaaaaaaa.onion.ns.example.com.", 120),
        NsRecord::new("bbbbbbbbbbbbbbbb.onion.ns.example.com.", 60),
    ]);
    let cache = Arc::new(MockOnionCache::new());
    let resolver = resolver_with(&lookup, &cache);

    let onion = resolver.resolve_to_onion("example.com.").await.unwrap();
    assert_eq!(onion.as_str(), "aaaaaaaaaaaaaaaa.onion");
}

#[tokio::test]
async fn test_empty_ns_set_is_no_records() {
    let lookup = MockNsLookup::empty();
    let cache = Arc::new(MockOnionCache::new());
    let resolver = resolver_with(&lookup, &cache);

    let result = resolver.resolve_to_onion("example.com").await;
    assert_eq!(result, Err(DomainError::NoRecords("example.com.".to_string())));
    assert_eq!(cache.len(), 0);
}

#[tokio::test]
async fn test_no_onion_among_nameservers() {
    let lookup = MockNsLookup::with_names(&["ns1.example.com", "ns2.example.com"], 100);
    let cache = Arc::new(MockOnionCache::new());
    let resolver = resolver_with(&lookup, &cache);

    let result = resolver.resolve_to_onion("example.com").await;
    assert_eq!(
        result,
        Err(DomainError::NoOnionFound("example.com.".to_string()))
    );
    assert_eq!(cache.len(), 0);
}

#[tokio::test]
async fn test_lookup_failure_propagates_without_caching() {
    let lookup = MockNsLookup::failing("I always throw");
    let cache = Arc::new(MockOnionCache::new());
    let resolver = resolver_with(&lookup, &cache);

    let result = resolver.resolve_to_onion("example.com").await;
    assert_eq!(result, Err(DomainError::Lookup("I always throw".to_string())));
    assert_eq!(cache.insertions(), 0);

    // Nothing cached, so the next call asks again.
    let _ = resolver.resolve_to_onion("example.com").await;
    assert_eq!(lookup.calls(), 2);
}

#[tokio::test]
async fn test_invalid_hostname_rejected_before_lookup() {
    let lookup = MockNsLookup::with_names(&[ONION_NS], 100);
    let cache = Arc::new(MockOnionCache::new());
    let resolver = resolver_with(&lookup, &cache);

    assert!(matches!(
        resolver.resolve_to_onion("").await,
        Err(DomainError::InvalidDomainName(_))
    ));
    assert_eq!(lookup.calls(), 0);
}

// ============================================================================
// Caching
// ============================================================================

#[tokio::test]
async fn test_cache_hit_skips_lookup() {
    let lookup = MockNsLookup::with_names(&[ONION_NS], 100);
    let cache = Arc::new(MockOnionCache::new());
    let resolver = resolver_with(&lookup, &cache);

    let first = resolver.resolve_to_onion("example.com").await.unwrap();
    let second = resolver.resolve_to_onion("example.com").await.unwrap();

    assert_eq!(first.as_str(), ONION);
    assert_eq!(second.as_str(), ONION);
    assert_eq!(lookup.calls(), 1);
}

#[tokio::test]
async fn test_hostname_spellings_share_cache_entry() {
    let lookup = MockNsLookup::with_names(&[ONION_NS], 100);
    let cache = Arc::new(MockOnionCache::new());
    let resolver = resolver_with(&lookup, &cache);

    resolver.resolve_to_onion("Example.COM").await.unwrap();
    resolver.resolve_to_onion("example.com.").await.unwrap();
    resolver.resolve_to_onion("example.com").await.unwrap();

    assert_eq!(lookup.calls(), 1);
}

#[tokio::test]
async fn test_expired_entry_triggers_new_lookup() {
    let lookup = MockNsLookup::with_names(&[ONION_NS], 1);
    let cache = Arc::new(MockOnionCache::new());
    let resolver = resolver_with(&lookup, &cache);

    resolver.resolve_to_onion("example.com").await.unwrap();
    tokio::time::sleep(Duration::from_secs(2)).await;
    resolver.resolve_to_onion("example.com").await.unwrap();

    assert_eq!(lookup.calls(), 2);
}

#[tokio::test]
async fn test_zero_ttl_is_not_cached() {
    let lookup = MockNsLookup::with_names(&[ONION_NS], 0);
    let cache = Arc::new(MockOnionCache::new());
    let resolver = resolver_with(&lookup, &cache);

    resolver.resolve_to_onion("example.com").await.unwrap();
    resolver.resolve_to_onion("example.com").await.unwrap();

    assert_eq!(cache.insertions(), 0);
    assert_eq!(lookup.calls(), 2);
}

// ============================================================================
// Deadlines and concurrency
// ============================================================================

#[tokio::test]
async fn test_hanging_lookup_times_out() {
    let lookup = MockNsLookup::hanging();
    let cache = Arc::new(MockOnionCache::new());
    let resolver = resolver_with(&lookup, &cache).with_timeout(Duration::from_millis(50));

    let result = resolver.resolve_to_onion("example.com").await;
    assert_eq!(result, Err(DomainError::QueryTimeout));
    assert_eq!(cache.len(), 0);
}

#[tokio::test]
async fn test_concurrent_resolutions_do_not_serialize() {
    let lookup = MockNsLookup::with_names(&[ONION_NS], 100).with_delay(Duration::from_millis(200));
    let cache = Arc::new(MockOnionCache::new());
    let resolver = Arc::new(resolver_with(&lookup, &cache));

    let start = std::time::Instant::now();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let resolver = Arc::clone(&resolver);
            tokio::spawn(async move {
                resolver
                    .resolve_to_onion(&format!("host{}.example.com", i))
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().as_str(), ONION);
    }

    assert_eq!(lookup.calls(), 8);
    assert!(
        start.elapsed() < Duration::from_millis(1000),
        "lookups ran sequentially: {:?}",
        start.elapsed()
    );
}
