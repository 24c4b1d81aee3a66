pub mod cache;
pub mod forwarding;
pub mod ns_lookup;
pub mod server;
pub mod transport;

pub use cache::{CacheMetrics, HostOnionCache};
pub use ns_lookup::{create_ns_lookup, DelegationNsLookup, DirectNsLookup, RecursiveUpstream};
pub use server::{DnsServer, StaticDnsHandler};
