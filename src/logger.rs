// src/logger.rs - Component-tagged tracing and subscriber setup
use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::settings::LoggingConfig;

/// Target of every event the library emits, so `RUST_LOG=at_people=debug`
/// selects them regardless of module.
const TARGET: &str = "at_people";

/// Output shape of the subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Json,
}

/// Tags every event with the component that raised it (`PeopleIndex`,
/// `FsVault`, ...) as a structured `component` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Logger {
    component: &'static str,
}

impl Logger {
    pub const fn new(component: &'static str) -> Self {
        Self { component }
    }

    pub fn component(&self) -> &'static str {
        self.component
    }

    pub fn info(&self, message: &str) {
        info!(target: TARGET, component = self.component, "{}", message);
    }

    pub fn warn(&self, message: &str) {
        warn!(target: TARGET, component = self.component, "{}", message);
    }

    pub fn error(&self, message: &str) {
        error!(target: TARGET, component = self.component, "{}", message);
    }

    pub fn debug(&self, message: &str) {
        debug!(target: TARGET, component = self.component, "{}", message);
    }
}

/// `RUST_LOG` wins over the configured level.
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Installs the global subscriber. Logs go to stderr; stdout is left to the
/// CLI's own output (`people --json`, printed links).
pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(config));
    let layer = fmt::layer().with_writer(std::io::stderr);

    let result = match config.format {
        LogFormat::Full => tracing::subscriber::set_global_default(registry.with(layer)),
        LogFormat::Compact => tracing::subscriber::set_global_default(registry.with(layer.compact())),
        LogFormat::Json => tracing::subscriber::set_global_default(registry.with(layer.json())),
    };

    result.context("Failed to set global subscriber")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_is_tagged() {
        const INDEX: Logger = Logger::new("PeopleIndex");
        assert_eq!(INDEX.component(), "PeopleIndex");

        let copy = INDEX;
        copy.debug("no subscriber installed, nothing to see");
        assert_eq!(copy, INDEX);
    }

    #[test]
    fn test_format_names() {
        assert_eq!(serde_json::from_str::<LogFormat>("\"json\"").unwrap(), LogFormat::Json);
        assert_eq!(serde_json::from_str::<LogFormat>("\"compact\"").unwrap(), LogFormat::Compact);
        assert_eq!(serde_json::to_string(&LogFormat::default()).unwrap(), "\"full\"");
        assert!(serde_json::from_str::<LogFormat>("\"pretty\"").is_err());
    }

    #[test]
    fn test_subscriber_installs_once() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            format: LogFormat::Compact,
        };

        init(&config).unwrap();
        let again = init(&config).unwrap_err();
        assert!(again.to_string().contains("global subscriber"));
    }
}
