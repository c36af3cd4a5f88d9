// src/vault/memory.rs - In-memory vault for hosts that keep their own file table
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{watch, RwLock};

use super::{clean_path, DocumentStore, StoreError};

#[derive(Debug, Default)]
struct Tree {
    /// Insertion order is the store's listing order.
    files: Vec<String>,
    folders: BTreeSet<String>,
}

impl Tree {
    fn add_parents(&mut self, path: &str) {
        let mut current = path;
        while let Some((parent, _)) = current.rsplit_once('/') {
            if parent.is_empty() || !self.folders.insert(parent.to_string()) {
                break;
            }
            current = parent;
        }
    }

    fn contains(&self, path: &str) -> bool {
        path.is_empty() || self.folders.contains(path) || self.files.iter().any(|f| f == path)
    }
}

pub struct MemoryVault {
    tree: RwLock<Tree>,
    ready: watch::Sender<bool>,
    read_only: AtomicBool,
}

impl MemoryVault {
    /// An empty vault that is ready immediately.
    pub fn new() -> Self {
        Self::with_paths(std::iter::empty::<String>())
    }

    pub fn with_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let vault = Self::loading_with_paths(paths);
        vault.mark_ready();
        vault
    }

    /// A vault whose listing is still being populated; [`DocumentStore::ready`]
    /// blocks until [`MemoryVault::mark_ready`].
    pub fn loading_with_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tree = Tree::default();
        for path in paths {
            let path = path.into();
            tree.add_parents(&path);
            tree.files.push(path);
        }

        let (ready, _) = watch::channel(false);
        Self {
            tree: RwLock::new(tree),
            ready,
            read_only: AtomicBool::new(false),
        }
    }

    pub fn mark_ready(&self) {
        self.ready.send_replace(true);
    }

    /// Makes every create fail, as a locked-down or full disk would.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Adds a file behind the store's back, e.g. another device syncing in.
    pub async fn insert(&self, path: impl Into<String>) {
        let path = path.into();
        let mut tree = self.tree.write().await;
        tree.add_parents(&path);
        if !tree.files.contains(&path) {
            tree.files.push(path);
        }
    }

    pub async fn folders(&self) -> Vec<String> {
        self.tree.read().await.folders.iter().cloned().collect()
    }

    fn check_writable(&self, path: &str) -> Result<(), StoreError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StoreError::Io {
                path: path.into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "vault is read-only"),
            });
        }
        Ok(())
    }
}

impl Default for MemoryVault {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryVault {
    async fn ready(&self) {
        let mut rx = self.ready.subscribe();
        // The sender lives as long as `self`, so this only returns once ready
        let _ = rx.wait_for(|ready| *ready).await;
    }

    async fn all_paths(&self) -> Vec<String> {
        self.tree.read().await.files.clone()
    }

    async fn exists(&self, path: &str) -> bool {
        match clean_path(path) {
            Ok(path) => self.tree.read().await.contains(path),
            Err(_) => false,
        }
    }

    async fn create_folder(&self, path: &str) -> Result<(), StoreError> {
        let cleaned = clean_path(path)?;
        self.check_writable(cleaned)?;

        let mut tree = self.tree.write().await;
        if tree.contains(cleaned) {
            return Err(StoreError::AlreadyExists(path.to_string()));
        }
        tree.add_parents(cleaned);
        tree.folders.insert(cleaned.to_string());
        Ok(())
    }

    async fn create(&self, path: &str, _content: &str) -> Result<(), StoreError> {
        let cleaned = clean_path(path)?;
        self.check_writable(cleaned)?;

        let mut tree = self.tree.write().await;
        if tree.contains(cleaned) {
            return Err(StoreError::AlreadyExists(path.to_string()));
        }
        // Like a filesystem, a document needs its folder to be there first
        if let Some((parent, _)) = cleaned.rsplit_once('/') {
            if !tree.folders.contains(parent) {
                return Err(StoreError::NotFound(parent.to_string()));
            }
        }
        tree.files.push(cleaned.to_string());
        Ok(())
    }
}
