// src/editor.rs - Editor surface used by trigger detection and link insertion
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Zero-based cursor position. `ch` counts characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct EditorPosition {
    pub line: usize,
    pub ch: usize,
}

impl EditorPosition {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

/// What the autocomplete needs from the host editor.
pub trait Editor: Send {
    fn line(&self, line: usize) -> Option<String>;

    fn cursor(&self) -> EditorPosition;

    /// Replaces `[start, end)` with `replacement`.
    fn replace_range(&mut self, replacement: &str, start: EditorPosition, end: EditorPosition);

    /// Text on the cursor's line up to the cursor column.
    fn text_before_cursor(&self) -> String {
        let cursor = self.cursor();
        self.line(cursor.line)
            .map(|line| line.chars().take(cursor.ch).collect())
            .unwrap_or_default()
    }
}

/// Plain in-memory document, one `String` per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    cursor: EditorPosition,
}

impl TextBuffer {
    pub fn new(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
            cursor: EditorPosition::default(),
        }
    }

    pub async fn open(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self::new(&text))
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        tokio::fs::write(path, self.text())
            .await
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Moves the cursor, clamped to the buffer.
    pub fn set_cursor(&mut self, position: EditorPosition) {
        self.cursor = self.clamp(position);
    }

    /// Puts the cursor at the end of `line`.
    pub fn set_cursor_to_line_end(&mut self, line: usize) {
        let line = line.min(self.lines.len().saturating_sub(1));
        let ch = self.lines.get(line).map(|l| l.chars().count()).unwrap_or(0);
        self.cursor = EditorPosition::new(line, ch);
    }

    fn clamp(&self, position: EditorPosition) -> EditorPosition {
        let line = position.line.min(self.lines.len().saturating_sub(1));
        let width = self.lines.get(line).map(|l| l.chars().count()).unwrap_or(0);
        EditorPosition::new(line, position.ch.min(width))
    }
}

fn byte_offset(line: &str, ch: usize) -> usize {
    line.char_indices().nth(ch).map(|(i, _)| i).unwrap_or(line.len())
}

impl Editor for TextBuffer {
    fn line(&self, line: usize) -> Option<String> {
        self.lines.get(line).cloned()
    }

    fn cursor(&self) -> EditorPosition {
        self.cursor
    }

    fn replace_range(&mut self, replacement: &str, start: EditorPosition, end: EditorPosition) {
        let (start, end) = {
            let a = self.clamp(start);
            let b = self.clamp(end);
            if a <= b { (a, b) } else { (b, a) }
        };

        let first = &self.lines[start.line];
        let last = &self.lines[end.line];
        let prefix = &first[..byte_offset(first, start.ch)];
        let suffix = &last[byte_offset(last, end.ch)..];

        let inserted: Vec<String> = format!("{prefix}{replacement}{suffix}")
            .split('\n')
            .map(str::to_string)
            .collect();

        // Cursor lands right after the inserted text
        let tail_width = suffix.chars().count();
        let cursor_line = start.line + inserted.len() - 1;
        let cursor_ch = inserted
            .last()
            .map(|l| l.chars().count() - tail_width)
            .unwrap_or(0);

        self.lines.splice(start.line..=end.line, inserted);
        self.cursor = EditorPosition::new(cursor_line, cursor_ch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_round_trips_trailing_newline() {
        let buffer = TextBuffer::new("one\ntwo\n");
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.text(), "one\ntwo\n");
    }

    #[test]
    fn test_text_before_cursor_counts_chars() {
        let mut buffer = TextBuffer::new("café @Zoë rest");
        buffer.set_cursor(EditorPosition::new(0, 9));
        assert_eq!(buffer.text_before_cursor(), "café @Zoë");
    }

    #[test]
    fn test_replace_range_within_line() {
        let mut buffer = TextBuffer::new("Met @Bo today");
        buffer.replace_range("[[@Bob Dole]]", EditorPosition::new(0, 4), EditorPosition::new(0, 7));
        assert_eq!(buffer.text(), "Met [[@Bob Dole]] today");
        assert_eq!(buffer.cursor(), EditorPosition::new(0, 17));
    }

    #[test]
    fn test_replace_range_with_multibyte_prefix() {
        let mut buffer = TextBuffer::new("Ärger mit @Jo");
        buffer.replace_range("[[@Jo]]", EditorPosition::new(0, 10), EditorPosition::new(0, 13));
        assert_eq!(buffer.text(), "Ärger mit [[@Jo]]");
    }

    #[test]
    fn test_replace_range_clamps_out_of_bounds() {
        let mut buffer = TextBuffer::new("a\nb");
        buffer.replace_range("X", EditorPosition::new(1, 0), EditorPosition::new(9, 9));
        assert_eq!(buffer.text(), "a\nX");
    }

    #[test]
    fn test_replace_range_spanning_lines() {
        let mut buffer = TextBuffer::new("first\nsecond\nthird");
        buffer.replace_range("-", EditorPosition::new(0, 2), EditorPosition::new(2, 2));
        assert_eq!(buffer.text(), "fi-ird");
        assert_eq!(buffer.cursor(), EditorPosition::new(0, 3));
    }

    #[test]
    fn test_set_cursor_to_line_end() {
        let mut buffer = TextBuffer::new("x\nhello @Al");
        buffer.set_cursor_to_line_end(1);
        assert_eq!(buffer.cursor(), EditorPosition::new(1, 9));
    }
}
