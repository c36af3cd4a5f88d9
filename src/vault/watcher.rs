// src/vault/watcher.rs - Filesystem notifications → VaultEvent
use anyhow::{Context, Result};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use crate::logger::Logger;
use super::fs::{list_files, relative_vault_path};
use super::VaultEvent;

/// Watches a vault directory and forwards normalised events in the order
/// the OS reported them. Dropping the watcher stops the stream.
pub struct VaultWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl VaultWatcher {
    pub fn spawn(root: &Path) -> Result<(Self, mpsc::UnboundedReceiver<VaultEvent>)> {
        // Notifications carry canonical paths, so the prefix must match them
        let root = std::fs::canonicalize(root)
            .with_context(|| format!("Failed to resolve vault root {}", root.display()))?;

        let (tx, rx) = mpsc::unbounded_channel();
        let logger = Logger::new("VaultWatcher");
        let callback_root = root.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                for vault_event in normalize_event(&callback_root, &event) {
                    if tx.send(vault_event).is_err() {
                        return;
                    }
                }
            }
            Err(e) => logger.warn(&format!("Watch error: {}", e)),
        })
        .context("Failed to create filesystem watcher")?;

        watcher
            .watch(&root, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch {}", root.display()))?;

        Logger::new("VaultWatcher").info(&format!("Watching {}", root.display()));

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Maps one raw notification onto zero or more vault events. Paths outside
/// the vault or under hidden folders are dropped.
///
/// A folder that appears or moves is reported once for the folder, so it is
/// expanded here into one event per file inside it.
pub fn normalize_event(root: &Path, event: &Event) -> Vec<VaultEvent> {
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(RenameMode::To)) => event
            .paths
            .iter()
            .flat_map(|path| files_at(path))
            .filter_map(|file| relative_vault_path(root, &file))
            .map(|path| VaultEvent::Created { path })
            .collect(),
        // A removed folder cannot be listed any more
        EventKind::Remove(_) => event
            .paths
            .iter()
            .filter_map(|path| relative_vault_path(root, path))
            .map(|path| VaultEvent::Deleted { path })
            .collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            let (from, to) = match event.paths.as_slice() {
                [from, to] => (from, to),
                _ => return Vec::new(),
            };
            files_at(to)
                .into_iter()
                .filter_map(|new_file| {
                    let old_file = match new_file.strip_prefix(to) {
                        Ok(child) if !child.as_os_str().is_empty() => from.join(child),
                        _ => from.clone(),
                    };
                    rename_event(root, &old_file, &new_file)
                })
                .collect()
        }
        _ => Vec::new(),
    }
}

/// The files a notification path stands for: itself, or everything under it
/// when it is a folder.
fn files_at(path: &Path) -> Vec<PathBuf> {
    if path.is_dir() {
        list_files(path, &Logger::new("VaultWatcher"))
    } else {
        vec![path.to_path_buf()]
    }
}

fn rename_event(root: &Path, from: &Path, to: &Path) -> Option<VaultEvent> {
    match (relative_vault_path(root, from), relative_vault_path(root, to)) {
        (Some(old_path), Some(path)) => Some(VaultEvent::Renamed { path, old_path }),
        // Moved in from outside (or from a hidden folder)
        (None, Some(path)) => Some(VaultEvent::Created { path }),
        // Moved out: the rename still has to evict the old name
        (Some(old_path), None) => Some(VaultEvent::Renamed {
            path: String::new(),
            old_path,
        }),
        (None, None) => None,
    }
}
