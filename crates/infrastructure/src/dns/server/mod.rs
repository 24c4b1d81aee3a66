pub mod handler;
pub mod listener;

pub use handler::StaticDnsHandler;
pub use listener::DnsServer;
