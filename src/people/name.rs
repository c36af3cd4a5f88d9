use crate::config::PeopleSettings;
use super::{DOCUMENT_EXTENSION, MARKER, SEPARATOR};

/// Derives the person name from a vault path, e.g. `People/@Bob Dole.md`
/// gives `Bob Dole`. Returns `None` for anything that is not a person note
/// under the configured people folder.
pub fn extract_person_name(path: &str, settings: &PeopleSettings) -> Option<String> {
    if !path.starts_with(settings.people_folder.as_str()) {
        return None;
    }

    let (_, file_name) = path.rsplit_once(SEPARATOR)?;
    let name = file_name
        .strip_prefix(MARKER)?
        .strip_suffix(DOCUMENT_EXTENSION)?
        .strip_suffix('.')?;

    if name.is_empty() {
        return None;
    }

    Some(name.to_string())
}
