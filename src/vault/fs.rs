// src/vault/fs.rs - Vault backed by a directory on disk
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;
use walkdir::WalkDir;

use crate::logger::Logger;
use super::{clean_path, is_hidden_segment, DocumentStore, StoreError};

pub struct FsVault {
    root: PathBuf,
    logger: Logger,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            logger: Logger::new("FsVault"),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a vault path.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        let cleaned = clean_path(path)?;
        if cleaned.is_empty() {
            return Ok(self.root.clone());
        }
        Ok(self.root.join(cleaned))
    }

    /// Vault path of an absolute location, or `None` when it lies outside
    /// the vault or under a hidden folder.
    pub fn vault_path(&self, absolute: &Path) -> Option<String> {
        relative_vault_path(&self.root, absolute)
    }

    fn io_error(path: PathBuf, source: std::io::Error) -> StoreError {
        match source.kind() {
            std::io::ErrorKind::AlreadyExists => StoreError::AlreadyExists(path.display().to_string()),
            std::io::ErrorKind::NotFound => StoreError::NotFound(path.display().to_string()),
            _ => StoreError::Io { path, source },
        }
    }
}

pub(crate) fn relative_vault_path(root: &Path, absolute: &Path) -> Option<String> {
    let relative = absolute.strip_prefix(root).ok()?;
    let mut segments = Vec::new();

    for component in relative.components() {
        match component {
            Component::Normal(segment) => {
                let segment = segment.to_str()?;
                if is_hidden_segment(segment) {
                    return None;
                }
                segments.push(segment);
            }
            _ => return None,
        }
    }

    if segments.is_empty() {
        return None;
    }

    Some(segments.join("/"))
}

/// Every file below `dir`, in file-name order. Hidden entries below `dir`
/// are skipped along with everything under them; `dir` itself is not checked.
pub(crate) fn list_files(dir: &Path, logger: &Logger) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .follow_links(false)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry
                .file_name()
                .to_str()
                .map(|name| !is_hidden_segment(name))
                .unwrap_or(false)
        });

    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => logger.warn(&format!("Skipping unreadable entry: {}", e)),
        }
    }
    files
}

#[async_trait]
impl DocumentStore for FsVault {
    async fn all_paths(&self) -> Vec<String> {
        let root = self.root.clone();
        let logger = self.logger.clone();

        let listing = tokio::task::spawn_blocking(move || {
            list_files(&root, &logger)
                .iter()
                .filter_map(|file| relative_vault_path(&root, file))
                .collect::<Vec<_>>()
        })
        .await;

        match listing {
            Ok(paths) => {
                self.logger.debug(&format!("Listed {} files under {}", paths.len(), self.root.display()));
                paths
            }
            Err(e) => {
                self.logger.error(&format!("Vault listing task failed: {}", e));
                Vec::new()
            }
        }
    }

    async fn exists(&self, path: &str) -> bool {
        match self.resolve(path) {
            Ok(absolute) => tokio::fs::metadata(absolute).await.is_ok(),
            Err(_) => false,
        }
    }

    async fn create_folder(&self, path: &str) -> Result<(), StoreError> {
        let absolute = self.resolve(path)?;
        if tokio::fs::metadata(&absolute).await.is_ok() {
            return Err(StoreError::AlreadyExists(path.to_string()));
        }

        tokio::fs::create_dir_all(&absolute)
            .await
            .map_err(|e| Self::io_error(absolute.clone(), e))?;

        self.logger.debug(&format!("Created folder {}", path));
        Ok(())
    }

    async fn create(&self, path: &str, content: &str) -> Result<(), StoreError> {
        let absolute = self.resolve(path)?;

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&absolute)
            .await
            .map_err(|e| Self::io_error(absolute.clone(), e))?;

        file.write_all(content.as_bytes())
            .await
            .map_err(|e| Self::io_error(absolute.clone(), e))?;
        file.flush()
            .await
            .map_err(|e| Self::io_error(absolute.clone(), e))?;

        self.logger.debug(&format!("Created document {}", path));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault() -> (tempfile::TempDir, FsVault) {
        let dir = tempfile::tempdir().unwrap();
        let vault = FsVault::new(dir.path());
        (dir, vault)
    }

    #[tokio::test]
    async fn test_all_paths_skips_hidden() {
        let (dir, vault) = vault();
        std::fs::create_dir_all(dir.path().join("People/Dole")).unwrap();
        std::fs::create_dir_all(dir.path().join(".obsidian")).unwrap();
        std::fs::write(dir.path().join("People/@Ann.md"), "").unwrap();
        std::fs::write(dir.path().join("People/Dole/@Bob Dole.md"), "").unwrap();
        std::fs::write(dir.path().join(".obsidian/app.json"), "{}").unwrap();
        std::fs::write(dir.path().join("People/.DS_Store"), "").unwrap();

        let mut paths = vault.all_paths().await;
        paths.sort();
        assert_eq!(paths, vec!["People/@Ann.md", "People/Dole/@Bob Dole.md"]);
    }

    #[tokio::test]
    async fn test_create_folder_then_document() {
        let (dir, vault) = vault();
        vault.create_folder("People/Dole").await.unwrap();
        vault.create("People/Dole/@Bob Dole.md", "").await.unwrap();

        assert!(vault.exists("People/Dole").await);
        assert!(vault.exists("People/Dole/@Bob Dole.md").await);
        assert!(dir.path().join("People/Dole/@Bob Dole.md").is_file());
    }

    #[tokio::test]
    async fn test_create_never_overwrites() {
        let (dir, vault) = vault();
        std::fs::write(dir.path().join("@Ann.md"), "notes").unwrap();

        let result = vault.create("@Ann.md", "").await;
        assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
        assert_eq!(std::fs::read_to_string(dir.path().join("@Ann.md")).unwrap(), "notes");
    }

    #[tokio::test]
    async fn test_existing_folder_is_reported() {
        let (_dir, vault) = vault();
        vault.create_folder("People").await.unwrap();
        assert!(matches!(vault.create_folder("People").await, Err(StoreError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_root_paths() {
        let (_dir, vault) = vault();
        assert!(vault.exists("").await);
        vault.create("/@Ann.md", "").await.unwrap();
        assert!(vault.exists("@Ann.md").await);
    }

    #[tokio::test]
    async fn test_missing_parent_is_not_found() {
        let (_dir, vault) = vault();
        assert!(matches!(vault.create("Nope/@Ann.md", "").await, Err(StoreError::NotFound(_))));
        assert!(!vault.exists("Nope").await);
    }

    #[test]
    fn test_list_files_is_sorted_and_skips_hidden() {
        let dir = tempfile::tempdir().unwrap();
        let lee = dir.path().join("Lee");
        std::fs::create_dir_all(lee.join(".trash")).unwrap();
        std::fs::write(lee.join("@Bo Lee.md"), "").unwrap();
        std::fs::write(lee.join("@Al Lee.md"), "").unwrap();
        std::fs::write(lee.join(".trash/@Cy Lee.md"), "").unwrap();

        let files = list_files(&lee, &Logger::new("FsVault"));
        assert_eq!(files, vec![lee.join("@Al Lee.md"), lee.join("@Bo Lee.md")]);
    }

    #[test]
    fn test_vault_path() {
        let vault = FsVault::new("/vault");
        assert_eq!(
            vault.vault_path(Path::new("/vault/People/@Ann.md")).as_deref(),
            Some("People/@Ann.md")
        );
        assert_eq!(vault.vault_path(Path::new("/vault/.git/HEAD")), None);
        assert_eq!(vault.vault_path(Path::new("/elsewhere/@Ann.md")), None);
        assert_eq!(vault.vault_path(Path::new("/vault")), None);
    }
}
