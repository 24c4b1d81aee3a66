pub mod dns;
pub mod resolve;

pub use dns::start_dns_server;
pub use resolve::run_resolver;
