// src/people/index.rs - Name → path index of person notes
use std::collections::btree_map::{self, BTreeMap};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::config::PeopleSettings;
use crate::logger::Logger;
use crate::vault::VaultEvent;
use super::name::extract_person_name;

/// Person name → vault path. Iterates in ascending name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PeopleIndex {
    entries: BTreeMap<String, String>,
}

impl PeopleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a fresh index from a full path listing. On a name collision
    /// the later path wins.
    pub fn rebuild<I, S>(paths: I, settings: &PeopleSettings) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::new();
        for path in paths {
            let path = path.as_ref();
            if let Some(name) = extract_person_name(path, settings) {
                index.entries.insert(name, path.to_string());
            }
        }
        index
    }

    /// Upserts the person behind `path`, if it is one. Deletions go through
    /// here too, so a deleted note stays indexed until it is renamed away.
    pub fn apply_create_or_delete(&mut self, path: &str, settings: &PeopleSettings) -> bool {
        match extract_person_name(path, settings) {
            Some(name) => {
                self.entries.insert(name, path.to_string());
                true
            }
            None => false,
        }
    }

    /// Upserts the new name, then drops the old name. The two steps are
    /// sequential: when both paths derive the same name the entry is removed.
    pub fn apply_rename(&mut self, new_path: &str, old_path: &str, settings: &PeopleSettings) -> bool {
        let mut changed = self.apply_create_or_delete(new_path, settings);

        if let Some(old_name) = extract_person_name(old_path, settings) {
            self.entries.remove(&old_name);
            changed = true;
        }

        changed
    }

    pub fn apply(&mut self, event: &VaultEvent, settings: &PeopleSettings) -> bool {
        match event {
            VaultEvent::Created { path } | VaultEvent::Deleted { path } => {
                self.apply_create_or_delete(path, settings)
            }
            VaultEvent::Renamed { path, old_path } => self.apply_rename(path, old_path, settings),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.entries.values().any(|p| p == path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a PeopleIndex {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owns the live index and publishes a fresh immutable snapshot after every
/// change. Readers hold a [`watch::Receiver`] and never see a half-applied
/// update.
pub struct PeopleIndexer {
    index: PeopleIndex,
    publisher: watch::Sender<Arc<PeopleIndex>>,
    logger: Logger,
}

impl PeopleIndexer {
    pub fn new() -> Self {
        let (publisher, _) = watch::channel(Arc::new(PeopleIndex::new()));
        Self {
            index: PeopleIndex::new(),
            publisher,
            logger: Logger::new("PeopleIndex"),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<PeopleIndex>> {
        self.publisher.subscribe()
    }

    /// Last published snapshot.
    pub fn snapshot(&self) -> Arc<PeopleIndex> {
        self.publisher.borrow().clone()
    }

    /// Replaces the working index without publishing it.
    pub fn rebuild<I, S>(&mut self, paths: I, settings: &PeopleSettings)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.index = PeopleIndex::rebuild(paths, settings);
        self.logger.info(&format!(
            "Rebuilt index under {:?}: {} people",
            settings.people_folder,
            self.index.len()
        ));
    }

    /// Applies one vault event and publishes when it touched the index.
    pub fn apply(&mut self, event: &VaultEvent, settings: &PeopleSettings) -> bool {
        let changed = self.index.apply(event, settings);
        if changed {
            self.logger.debug(&format!("Index updated by {:?}", event));
            self.publish();
        }
        changed
    }

    pub fn publish(&self) {
        // send_replace keeps the value even with no live receivers
        self.publisher.send_replace(Arc::new(self.index.clone()));
    }
}

impl Default for PeopleIndexer {
    fn default() -> Self {
        Self::new()
    }
}
