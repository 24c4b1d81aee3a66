#![allow(dead_code)]
pub mod builders;
pub mod dns_server_mock;

#[allow(unused_imports)]
pub use builders::*;
#[allow(unused_imports)]
pub use dns_server_mock::{MockDnsServer, ScriptedAnswer};
