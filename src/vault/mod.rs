pub mod fs;
pub mod memory;
pub mod watcher;

pub use fs::FsVault;
pub use memory::MemoryVault;
pub use watcher::VaultWatcher;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// File lifecycle event, normalised from whatever the host reports.
/// Paths are vault-relative and `/`-separated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VaultEvent {
    Created { path: String },
    Deleted { path: String },
    Renamed { path: String, old_path: String },
}

impl VaultEvent {
    /// Path the event leaves behind (the new path for renames).
    pub fn path(&self) -> &str {
        match self {
            VaultEvent::Created { path }
            | VaultEvent::Deleted { path }
            | VaultEvent::Renamed { path, .. } => path,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} already exists")]
    AlreadyExists(String),
    /// The parent folder of a new document is missing.
    #[error("{0} does not exist")]
    NotFound(String),
    #[error("invalid vault path {0:?}")]
    InvalidPath(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The document store holding the vault.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Resolves once the store's path listing is complete.
    async fn ready(&self) {}

    /// Every known file path, in store-defined order.
    async fn all_paths(&self) -> Vec<String>;

    async fn exists(&self, path: &str) -> bool;

    async fn create_folder(&self, path: &str) -> Result<(), StoreError>;

    /// Creates a new document; fails with [`StoreError::AlreadyExists`]
    /// rather than overwriting.
    async fn create(&self, path: &str, content: &str) -> Result<(), StoreError>;
}

/// Strips the leading `/` a root-level target folder produces and rejects
/// paths that would climb out of the vault.
pub(crate) fn clean_path(path: &str) -> Result<&str, StoreError> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.split('/').any(|segment| segment == "..") {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    Ok(trimmed)
}

/// Hidden files and folders (`.obsidian`, `.git`, `.DS_Store`, ...) are not
/// part of the vault.
pub(crate) fn is_hidden_segment(segment: &str) -> bool {
    segment.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("/@Ann.md").unwrap(), "@Ann.md");
        assert_eq!(clean_path("People/@Ann.md").unwrap(), "People/@Ann.md");
        assert_eq!(clean_path("").unwrap(), "");
        assert!(matches!(clean_path("People/../../etc"), Err(StoreError::InvalidPath(_))));
    }

    #[test]
    fn test_event_path() {
        let renamed = VaultEvent::Renamed {
            path: "People/@Bo.md".to_string(),
            old_path: "People/@Ann.md".to_string(),
        };
        assert_eq!(renamed.path(), "People/@Bo.md");
    }

    #[test]
    fn test_event_json_shape() {
        let event = VaultEvent::Created { path: "People/@Ann.md".to_string() };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "created");
        assert_eq!(json["path"], "People/@Ann.md");
    }
}
