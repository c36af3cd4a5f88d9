// src/config/people.rs - Persisted people options (the plugin data blob)
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_PEOPLE_FOLDER: &str = "People/";

/// User-editable options shared by name extraction and link building.
///
/// Keys are camelCase on disk so an existing plugin `data.json` loads as-is.
/// Missing keys fall back to their defaults, which is how a partial blob is
/// merged over [`PeopleSettings::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PeopleSettings {
    /// Folder holding people notes, with a trailing slash, e.g. `People/`.
    pub people_folder: String,
    /// Insert `[[People/@Bob Dole.md|@Bob Dole]]` instead of `[[@Bob Dole]]`.
    pub use_explicit_links: bool,
    /// Store notes under a sub-folder named after the last word of the name.
    pub use_last_name_folder: bool,
}

impl Default for PeopleSettings {
    fn default() -> Self {
        Self {
            people_folder: DEFAULT_PEOPLE_FOLDER.to_string(),
            use_explicit_links: false,
            use_last_name_folder: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("settings file {path} is not valid JSON: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistence for [`PeopleSettings`].
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// `None` when nothing has been saved yet.
    async fn load(&self) -> Result<Option<PeopleSettings>, SettingsError>;
    async fn save(&self, settings: &PeopleSettings) -> Result<(), SettingsError>;
}

/// Stores the settings blob as pretty JSON at a fixed path.
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SettingsError {
        SettingsError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl SettingsStore for JsonSettingsStore {
    async fn load(&self) -> Result<Option<PeopleSettings>, SettingsError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        // An empty or `null` blob means "nothing saved", same as a missing file
        if raw.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str::<Option<PeopleSettings>>(&raw).map_err(|source| {
            SettingsError::Malformed {
                path: self.path.clone(),
                source,
            }
        })
    }

    async fn save(&self, settings: &PeopleSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| self.io_error(e))?;
            }
        }

        let json = serde_json::to_string_pretty(settings).map_err(|source| {
            SettingsError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| self.io_error(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = PeopleSettings::default();
        assert_eq!(settings.people_folder, "People/");
        assert!(!settings.use_explicit_links);
        assert!(!settings.use_last_name_folder);
    }

    #[test]
    fn test_partial_blob_merges_over_defaults() {
        let settings: PeopleSettings = serde_json::from_str(r#"{"useExplicitLinks": true}"#).unwrap();
        assert_eq!(settings.people_folder, "People/");
        assert!(settings.use_explicit_links);
        assert!(!settings.use_last_name_folder);
    }

    #[test]
    fn test_camel_case_keys() {
        let json = serde_json::to_value(PeopleSettings::default()).unwrap();
        assert_eq!(json["peopleFolder"], "People/");
        assert_eq!(json["useExplicitLinks"], false);
        assert_eq!(json["useLastNameFolder"], false);
    }

    #[tokio::test]
    async fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSettingsStore::new(dir.path().join("data.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSettingsStore::new(dir.path().join("plugins/at-people/data.json"));
        let settings = PeopleSettings {
            people_folder: "Contacts/".to_string(),
            use_explicit_links: true,
            use_last_name_folder: true,
        };

        store.save(&settings).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(settings));
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = JsonSettingsStore::new(&path);
        assert!(matches!(store.load().await, Err(SettingsError::Malformed { .. })));
    }

    #[tokio::test]
    async fn test_null_blob_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "null").unwrap();

        let store = JsonSettingsStore::new(&path);
        assert!(store.load().await.unwrap().is_none());
    }
}
