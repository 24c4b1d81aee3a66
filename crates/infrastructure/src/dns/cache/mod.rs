// Host -> onion cache with a byte budget

pub mod metrics;
pub mod record;
pub mod storage;

pub use metrics::CacheMetrics;
pub use record::CachedOnion;
pub use storage::HostOnionCache;
