#![allow(dead_code)]

mod mock_ports;

pub use mock_ports::{MockNsLookup, MockOnionCache};
