//! Configuration module for Onion Gateway
//!
//! This module contains all configuration structures organized by concern:
//! - `root`: Main configuration and CLI overrides
//! - `server`: Authoritative nameserver binding
//! - `resolver`: Host-to-onion resolution (NS lookup strategy, cache budget)
//! - `zone`: Static zone served by the authoritative nameserver
//! - `logging`: Logging settings
//! - `errors`: Configuration errors

pub mod errors;
pub mod logging;
pub mod resolver;
pub mod root;
pub mod server;
pub mod zone;

pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use resolver::{LookupStrategy, ResolverConfig};
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use zone::ZoneConfig;
