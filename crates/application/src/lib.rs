//! Onion Gateway Application Layer
//!
//! Ports the infrastructure implements, the shared sampling service and the
//! two resolution use cases.
pub mod ports;
pub mod services;
pub mod use_cases;
