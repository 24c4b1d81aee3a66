//! Onion Gateway Infrastructure Layer
//!
//! DNS wire handling (hickory-proto), UDP/TCP transports, the NS lookup
//! strategies, the host->onion cache and the authoritative responder.
pub mod dns;
pub mod system;
