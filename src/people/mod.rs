//! `@person` notes: extracting names from vault paths, keeping the
//! name → path index current, and the `@` autocomplete built on top of it.

pub mod index;
pub mod name;
pub mod resolve;
pub mod suggest;
pub mod trigger;

pub use index::{PeopleIndex, PeopleIndexer};
pub use name::extract_person_name;
pub use resolve::{CreationOutcome, Resolution, SelectionResolver};
pub use suggest::{get_suggestions, Suggestion};
pub use trigger::{detect_trigger, on_trigger, TriggerContext};

/// Character that opens an autocomplete session and prefixes person filenames.
pub const MARKER: char = '@';

/// Extension of person documents, without the dot.
pub const DOCUMENT_EXTENSION: &str = "md";

/// Vault path separator. Vault paths are always `/`-separated.
pub const SEPARATOR: char = '/';
