pub mod config;
pub mod logging;

pub use config::{load_config, load_zone};
pub use logging::init_logging;
