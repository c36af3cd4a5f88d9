use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::logger::LogFormat;

/// Application settings for the `at-people` binary. The per-vault people
/// options live in [`super::PeopleSettings`] and are persisted separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub vault: VaultConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    pub path: PathBuf,
    /// Plugin data blob, relative to the vault root unless absolute.
    pub data_file: PathBuf,
}

impl VaultConfig {
    pub fn data_file_path(&self) -> PathBuf {
        if self.data_file.is_absolute() {
            self.data_file.clone()
        } else {
            self.path.join(&self.data_file)
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("logging.level", "info")?
            .set_default("logging.format", "full")?
            .set_default("vault.path", ".")?
            .set_default("vault.data_file", ".obsidian/plugins/at-people/data.json")?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("AT_PEOPLE").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
