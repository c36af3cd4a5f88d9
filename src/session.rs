// src/session.rs - Wires the vault, the people index and the @ autocomplete
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

use crate::config::{PeopleSettings, SettingsStore};
use crate::editor::Editor;
use crate::logger::Logger;
use crate::people::{
    get_suggestions, on_trigger, PeopleIndex, PeopleIndexer, Resolution, SelectionResolver,
    Suggestion, TriggerContext,
};
use crate::vault::{DocumentStore, VaultEvent};

/// One running `@people` session over a single vault.
pub struct AtPeople {
    store: Arc<dyn DocumentStore>,
    settings_store: Arc<dyn SettingsStore>,
    settings: PeopleSettings,
    indexer: PeopleIndexer,
    index: watch::Receiver<Arc<PeopleIndex>>,
    resolver: SelectionResolver,
    logger: Logger,
}

impl AtPeople {
    /// Loads the persisted settings over the defaults. The index stays empty
    /// until [`AtPeople::initialize`].
    pub async fn load(
        store: Arc<dyn DocumentStore>,
        settings_store: Arc<dyn SettingsStore>,
    ) -> Result<Self> {
        let settings = settings_store
            .load()
            .await
            .context("Failed to load people settings")?
            .unwrap_or_default();

        let indexer = PeopleIndexer::new();
        let index = indexer.subscribe();

        Ok(Self {
            store,
            settings_store,
            settings,
            indexer,
            index,
            resolver: SelectionResolver::new().context("Failed to compile last-name pattern")?,
            logger: Logger::new("AtPeople"),
        })
    }

    /// Waits for the store's listing, rebuilds the index, then publishes it
    /// one scheduler tick later so subscribers are settled first.
    pub async fn initialize(&mut self) {
        self.store.ready().await;
        self.rebuild().await;
        tokio::task::yield_now().await;
        self.indexer.publish();
        self.logger.info(&format!("Ready with {} people", self.indexer.snapshot().len()));
    }

    async fn rebuild(&mut self) {
        let paths = self.store.all_paths().await;
        self.indexer.rebuild(&paths, &self.settings);
    }

    /// Applies one vault event; returns whether a new index was published.
    pub fn handle_event(&mut self, event: &VaultEvent) -> bool {
        self.indexer.apply(event, &self.settings)
    }

    /// Drains `events`, each one fully applied before the next is read.
    pub async fn run(&mut self, mut events: mpsc::UnboundedReceiver<VaultEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_event(&event);
        }
        self.logger.info("Event stream closed");
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<PeopleIndex>> {
        self.indexer.subscribe()
    }

    /// Current published index.
    pub fn index(&self) -> Arc<PeopleIndex> {
        self.index.borrow().clone()
    }

    pub fn settings(&self) -> &PeopleSettings {
        &self.settings
    }

    pub fn on_trigger(&self, editor: &dyn Editor) -> Option<TriggerContext> {
        on_trigger(editor)
    }

    pub fn suggestions(&self, context: &TriggerContext) -> Vec<Suggestion> {
        get_suggestions(&context.query, &self.index.borrow())
    }

    pub async fn select(
        &self,
        suggestion: &Suggestion,
        context: &TriggerContext,
        editor: &mut dyn Editor,
    ) -> Resolution {
        self.resolver
            .resolve(suggestion, context, &self.settings, self.store.as_ref(), editor)
            .await
    }

    /// Changing the folder re-derives every name, so the index is rebuilt.
    pub async fn set_people_folder(&mut self, folder: impl Into<String>) -> Result<()> {
        self.settings.people_folder = folder.into();
        self.save_settings().await?;
        self.rebuild().await;
        self.indexer.publish();
        Ok(())
    }

    pub async fn set_use_explicit_links(&mut self, enabled: bool) -> Result<()> {
        self.settings.use_explicit_links = enabled;
        self.save_settings().await
    }

    pub async fn set_use_last_name_folder(&mut self, enabled: bool) -> Result<()> {
        self.settings.use_last_name_folder = enabled;
        self.save_settings().await
    }

    async fn save_settings(&self) -> Result<()> {
        self.settings_store
            .save(&self.settings)
            .await
            .context("Failed to save people settings")?;
        self.logger.debug(&format!("Saved settings {:?}", self.settings));
        Ok(())
    }
}
