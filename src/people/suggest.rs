use serde::{Deserialize, Serialize};
use std::fmt;

use super::index::PeopleIndex;

/// One row of the `@` menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Suggestion {
    /// A person already in the index.
    Existing { name: String },
    /// Create a note for whatever was typed, as typed.
    CreateNew { raw_query: String },
}

impl Suggestion {
    /// Name the resulting link and note will carry.
    pub fn display_name(&self) -> &str {
        match self {
            Suggestion::Existing { name } => name,
            Suggestion::CreateNew { raw_query } => raw_query,
        }
    }

    pub fn is_create_new(&self) -> bool {
        matches!(self, Suggestion::CreateNew { .. })
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suggestion::Existing { name } => f.write_str(name),
            Suggestion::CreateNew { raw_query } => write!(f, "New person: {}", raw_query),
        }
    }
}

/// Case-insensitive prefix matches in index order, then a single
/// [`Suggestion::CreateNew`] for the raw query, always last.
pub fn get_suggestions(query: &str, index: &PeopleIndex) -> Vec<Suggestion> {
    let needle = query.to_lowercase();

    let mut suggestions: Vec<Suggestion> = index
        .names()
        .filter(|name| name.to_lowercase().starts_with(&needle))
        .map(|name| Suggestion::Existing { name: name.to_string() })
        .collect();

    suggestions.push(Suggestion::CreateNew {
        raw_query: query.to_string(),
    });

    suggestions
}
