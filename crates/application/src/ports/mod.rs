mod ns_lookup;
mod onion_cache;

pub use ns_lookup::NsLookup;
pub use onion_cache::{CacheStats, OnionCache};
