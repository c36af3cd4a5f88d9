use serde::{Deserialize, Serialize};

use crate::editor::{Editor, EditorPosition};
use super::MARKER;

/// Token that closes a wiki link. A query containing it sits inside (or
/// after) a finished link and must not re-open the menu.
const LINK_CLOSE: &str = "]]";

/// Span from the `@` up to the cursor, plus the text typed after the `@`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerContext {
    pub start: EditorPosition,
    pub end: EditorPosition,
    pub query: String,
}

/// Decides whether the text left of the cursor opens an `@` session.
///
/// `chars_left` is the cursor's line truncated at the cursor. The last `@`
/// wins; it must start the line or follow a plain space, and the text after
/// it must be non-empty and free of `]]`.
pub fn detect_trigger(chars_left: &str, cursor: EditorPosition) -> Option<TriggerContext> {
    let at = chars_left.rfind(MARKER)?;
    let query = &chars_left[at + MARKER.len_utf8()..];

    if query.is_empty() || query.contains(LINK_CLOSE) {
        return None;
    }

    let before = &chars_left[..at];
    if !before.is_empty() && !before.ends_with(' ') {
        return None;
    }

    Some(TriggerContext {
        start: EditorPosition::new(cursor.line, before.chars().count()),
        end: cursor,
        query: query.to_string(),
    })
}

/// [`detect_trigger`] against the editor's current line and cursor.
pub fn on_trigger(editor: &dyn Editor) -> Option<TriggerContext> {
    detect_trigger(&editor.text_before_cursor(), editor.cursor())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::TextBuffer;

    fn at_end(line: usize, text: &str) -> Option<TriggerContext> {
        detect_trigger(text, EditorPosition::new(line, text.chars().count()))
    }

    #[test]
    fn test_after_space() {
        let ctx = at_end(3, "Meeting with @Bo").unwrap();
        assert_eq!(ctx.query, "Bo");
        assert_eq!(ctx.start, EditorPosition::new(3, 13));
        assert_eq!(ctx.end, EditorPosition::new(3, 16));
    }

    #[test]
    fn test_start_of_line() {
        let ctx = at_end(0, "@Ann").unwrap();
        assert_eq!(ctx.query, "Ann");
        assert_eq!(ctx.start.ch, 0);
    }

    #[test]
    fn test_glued_to_word() {
        assert_eq!(at_end(0, "foo@Bo"), None);
        assert_eq!(at_end(0, "mail me at bob@example"), None);
    }

    #[test]
    fn test_only_plain_space_counts() {
        assert_eq!(at_end(0, "list:\t@Bo"), None);
        assert_eq!(at_end(0, "(@Bo"), None);
    }

    #[test]
    fn test_inside_finished_link() {
        assert_eq!(at_end(0, "@Bo]]"), None);
        assert_eq!(at_end(0, "see [[@Bob Dole]] and"), None);
    }

    #[test]
    fn test_no_marker() {
        assert_eq!(at_end(0, "nothing to see"), None);
        assert_eq!(at_end(0, ""), None);
    }

    #[test]
    fn test_bare_marker() {
        assert_eq!(at_end(0, "hello @"), None);
    }

    #[test]
    fn test_last_marker_wins() {
        let ctx = at_end(0, "@Ann and @Bo").unwrap();
        assert_eq!(ctx.query, "Bo");
        assert_eq!(ctx.start.ch, 9);
    }

    #[test]
    fn test_query_may_contain_spaces() {
        let ctx = at_end(0, "with @Bob Do").unwrap();
        assert_eq!(ctx.query, "Bob Do");
    }

    #[test]
    fn test_columns_count_chars() {
        let ctx = at_end(0, "Grüße an @Zoë").unwrap();
        assert_eq!(ctx.start.ch, 9);
        assert_eq!(ctx.end.ch, 13);
        assert_eq!(ctx.query, "Zoë");
    }

    #[test]
    fn test_on_trigger_uses_cursor_line() {
        let mut buffer = TextBuffer::new("# Notes\nCall @Ali tomorrow");
        buffer.set_cursor(EditorPosition::new(1, 9));

        let ctx = on_trigger(&buffer).unwrap();
        assert_eq!(ctx.query, "Ali");
        assert_eq!(ctx.start, EditorPosition::new(1, 5));
        assert_eq!(ctx.end, EditorPosition::new(1, 9));
    }
}
