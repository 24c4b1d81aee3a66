mod resolve_onion;
mod static_answer;

pub use resolve_onion::HostToOnionResolver;
pub use static_answer::StaticDnsResolver;
