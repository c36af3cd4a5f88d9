// src/people/resolve.rs - Turning a picked suggestion into a note and a link
use regex::Regex;
use serde::Serialize;

use crate::config::PeopleSettings;
use crate::editor::Editor;
use crate::logger::Logger;
use crate::vault::{DocumentStore, StoreError};
use super::suggest::Suggestion;
use super::trigger::TriggerContext;
use super::{DOCUMENT_EXTENSION, MARKER, SEPARATOR};

/// What happened when making sure a folder or note exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum CreationOutcome {
    Created,
    AlreadyExisted,
    Failed(String),
}

/// Where a person note lives and the link text pointing at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkPlan {
    pub display_name: String,
    /// Folder with trailing separator, e.g. `People/Dole/`.
    pub folder: String,
    /// `folder` + `@<name>.md`.
    pub path: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub link: String,
    pub path: String,
    pub folder: CreationOutcome,
    pub document: CreationOutcome,
}

pub struct SelectionResolver {
    last_name_regex: Regex,
    logger: Logger,
}

impl SelectionResolver {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            last_name_regex: Regex::new(r"(\S+)$")?,
            logger: Logger::new("SelectionResolver"),
        })
    }

    /// Trailing run of non-whitespace, e.g. `Dole` for `Bob Dole`. Empty
    /// when the name is empty or ends in whitespace.
    pub fn last_name_token<'a>(&self, display_name: &'a str) -> &'a str {
        self.last_name_regex
            .captures(display_name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or("")
    }

    pub fn plan(&self, suggestion: &Suggestion, settings: &PeopleSettings) -> LinkPlan {
        let display_name = suggestion.display_name();
        let last_name = self.last_name_token(display_name);

        let mut folder = settings.people_folder.clone();
        if !folder.ends_with(SEPARATOR) {
            folder.push(SEPARATOR);
        }
        if settings.use_last_name_folder && !last_name.is_empty() {
            folder.push_str(last_name);
            folder.push(SEPARATOR);
        }

        let file_name = format!("{MARKER}{display_name}.{DOCUMENT_EXTENSION}");
        let path = format!("{folder}{file_name}");

        let link = if settings.use_explicit_links {
            format!("[[{path}|{MARKER}{display_name}]]")
        } else {
            format!("[[{MARKER}{display_name}]]")
        };

        LinkPlan {
            display_name: display_name.to_string(),
            folder,
            path,
            link,
        }
    }

    /// Makes sure the note exists, then swaps the `@query` span for the link.
    /// Creation problems are logged and reported but never stop the insert.
    pub async fn resolve(
        &self,
        suggestion: &Suggestion,
        context: &TriggerContext,
        settings: &PeopleSettings,
        store: &dyn DocumentStore,
        editor: &mut dyn Editor,
    ) -> Resolution {
        let plan = self.plan(suggestion, settings);

        let folder_path = plan.folder.strip_suffix(SEPARATOR).unwrap_or(&plan.folder);
        let folder = self.ensure_folder(store, folder_path).await;
        let document = self.ensure_document(store, &plan.path).await;

        editor.replace_range(&plan.link, context.start, context.end);
        self.logger.info(&format!("Inserted {} for {:?}", plan.link, context.query));

        Resolution {
            link: plan.link,
            path: plan.path,
            folder,
            document,
        }
    }

    async fn ensure_folder(&self, store: &dyn DocumentStore, path: &str) -> CreationOutcome {
        if store.exists(path).await {
            return CreationOutcome::AlreadyExisted;
        }
        match store.create_folder(path).await {
            Ok(()) => CreationOutcome::Created,
            Err(e) => self.creation_failed("folder", path, e),
        }
    }

    async fn ensure_document(&self, store: &dyn DocumentStore, path: &str) -> CreationOutcome {
        if store.exists(path).await {
            return CreationOutcome::AlreadyExisted;
        }
        match store.create(path, "").await {
            Ok(()) => CreationOutcome::Created,
            Err(e) => self.creation_failed("file", path, e),
        }
    }

    fn creation_failed(&self, what: &str, path: &str, error: StoreError) -> CreationOutcome {
        self.logger.warn(&format!("Could not create {} {}: {}", what, path, error));
        match error {
            StoreError::AlreadyExists(_) => CreationOutcome::AlreadyExisted,
            other => CreationOutcome::Failed(other.to_string()),
        }
    }
}
