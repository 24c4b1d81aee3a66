use super::ConfigError;
use serde::{Deserialize, Serialize};

const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// `[logging]`: the default filter when `RUST_LOG` is unset.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// A level (`info`) or a tracing filter directive list
    /// (`warn,onion_gateway_infrastructure=debug`).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl LoggingConfig {
    /// The filter string with whitespace and level case normalised.
    pub fn filter(&self) -> String {
        self.level
            .split(',')
            .map(|directive| {
                let directive = directive.trim();
                if LEVELS.contains(&directive.to_ascii_lowercase().as_str()) {
                    directive.to_ascii_lowercase()
                } else {
                    directive.to_string()
                }
            })
            .filter(|directive| !directive.is_empty())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Every directive must end in a known level (`target=level` or `level`).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let filter = self.filter();
        if filter.is_empty() {
            return Err(ConfigError::Validation(
                "logging.level must not be empty".to_string(),
            ));
        }
        for directive in filter.split(',') {
            let level = directive.rsplit('=').next().unwrap_or(directive);
            if !LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(ConfigError::Validation(format!(
                    "logging.level: unknown level in '{}'",
                    directive
                )));
            }
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
