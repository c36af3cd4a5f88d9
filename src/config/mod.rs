pub mod people;
pub mod settings;

pub use people::{JsonSettingsStore, PeopleSettings, SettingsError, SettingsStore};
pub use settings::{LoggingConfig, Settings, VaultConfig};
