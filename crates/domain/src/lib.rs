//! Onion Gateway Domain Layer
pub mod config;
pub mod dns_query;
pub mod dns_record;
pub mod errors;
pub mod onion;
pub mod static_zone;
pub mod validators;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_query::DnsQuery;
pub use dns_record::{NsRecord, RecordType};
pub use errors::DomainError;
pub use onion::OnionAddress;
pub use static_zone::StaticDnsConfig;
