//! Editor host boundary
//!
//! The dispatcher only talks to the editing surface through [`EditorHost`].
//! All calls happen on the host task; worker tasks never touch it.

use std::path::Path;

/// Zero-based cursor position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
}

impl Cursor {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Operations the editing surface provides
pub trait EditorHost {
    /// Path of the file in the active view
    fn file_path(&self) -> Option<&Path>;

    /// Full buffer text
    fn buffer_text(&self) -> String;

    fn cursor(&self) -> Cursor;

    /// Replace the entire buffer
    fn replace_buffer(&mut self, text: &str);

    /// Modal single-line prompt. `None` means the user cancelled.
    fn prompt(&mut self, label: &str, default: &str) -> Option<String>;

    /// Show read-only text in the output panel
    fn show_panel(&mut self, title: &str, text: &str);

    fn set_clipboard(&mut self, text: &str);
}

/// Text of line `line` in `text`, if it exists
pub fn line_at(text: &str, line: usize) -> Option<&str> {
    text.lines().nth(line)
}

/// Identifier touching `cursor`, empty when the cursor is not on a word
pub fn word_at(text: &str, cursor: Cursor) -> String {
    let Some(line) = line_at(text, cursor.line) else {
        return String::new();
    };
    let chars: Vec<char> = line.chars().collect();
    let is_word = |c: &char| c.is_alphanumeric() || *c == '_';

    let mut anchor = cursor.column.min(chars.len());
    if !chars.get(anchor).is_some_and(is_word) {
        // Cursor right after a word still selects it
        if anchor > 0 && is_word(&chars[anchor - 1]) {
            anchor -= 1;
        } else {
            return String::new();
        }
    }

    let start = chars[..anchor]
        .iter()
        .rposition(|c| !is_word(c))
        .map_or(0, |i| i + 1);
    let end = chars[anchor..]
        .iter()
        .position(|c| !is_word(c))
        .map_or(chars.len(), |i| anchor + i);

    chars[start..end].iter().collect()
}
