//! Open document text kept in a rope
//!
//! Incremental edits address text by (line, character); positions beyond the
//! end of a line or of the document are clamped before the edit is applied.

use ropey::Rope;
use tower_lsp::lsp_types::{Position, TextDocumentContentChangeEvent};

/// Text and version of one open document.
#[derive(Debug, Clone)]
pub struct TextDocument {
    pub text: Rope,
    pub version: i32,
}

/// Converts an LSP position (UTF-16 column) to a char index in the rope.
fn position_to_char_index(position: &Position, text: &Rope) -> usize {
    let line = (position.line as usize).min(text.len_lines().saturating_sub(1));
    let line_start = text.line_to_char(line);
    let line_slice = text.line(line);
    let mut line_len = line_slice.len_chars();
    // The terminator is not addressable.
    if line_len > 0 && line_slice.char(line_len - 1) == '\n' {
        line_len -= 1;
        if line_len > 0 && line_slice.char(line_len - 1) == '\r' {
            line_len -= 1;
        }
    }
    let mut units = 0usize;
    let mut column = 0usize;
    for c in line_slice.chars().take(line_len) {
        if units >= position.character as usize {
            break;
        }
        units += c.len_utf16();
        column += 1;
    }
    line_start + column
}

impl TextDocument {
    pub fn new(text: &str, version: i32) -> Self {
        Self { text: Rope::from_str(text), version }
    }

    /// Applies `changes` in order. Changes for a version not newer than the
    /// current one are rejected.
    pub fn apply(&mut self, changes: &[TextDocumentContentChangeEvent], version: i32) -> Result<(), String> {
        if version <= self.version {
            return Err(format!("Version {} not newer than {}", version, self.version));
        }
        for change in changes {
            match change.range {
                Some(range) => {
                    let start = position_to_char_index(&range.start, &self.text);
                    let end = position_to_char_index(&range.end, &self.text).max(start);
                    self.text.remove(start..end);
                    self.text.insert(start, &change.text);
                }
                None => self.text = Rope::from_str(&change.text),
            }
        }
        self.version = version;
        Ok(())
    }

    pub fn content(&self) -> String {
        self.text.to_string()
    }
}
