//! Position conversion between byte offsets and editor positions
//!
//! Tree-sitter and `regex` both report byte offsets. Editors address text by
//! (line, column) where the column counts UTF-16 code units within the line,
//! the LSP default encoding. A
//! [`LineIndex`] records where each line starts so conversions in either
//! direction cost a binary search plus a scan of a single line.
//!
//! Positions past the end of a line or the document are clamped, never
//! rejected.

use tower_lsp::lsp_types::{Position, Range};

/// Byte offsets of line starts for one version of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_starts }
    }

    /// Converts a byte offset into a (line, character) position.
    pub fn position(&self, text: &str, offset: usize) -> Position {
        let offset = floor_char_boundary(text, offset.min(text.len()));
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = self.line_starts[line];
        Position::new(line as u32, utf16_column(&text[start..], offset - start))
    }

    pub fn range(&self, text: &str, start: usize, end: usize) -> Range {
        Range::new(self.position(text, start), self.position(text, end))
    }

    /// Converts a position into a byte offset, clamping the line to the
    /// document and the column to the line.
    pub fn offset(&self, text: &str, position: Position) -> usize {
        let line = (position.line as usize).min(self.line_starts.len() - 1);
        let start = self.line_starts[line];
        let end = self
            .line_starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(text.len());
        let line_text = &text[start..end];
        start + byte_offset(line_text, position.character)
    }
}

/// Number of UTF-16 code units in `line[..byte]`.
pub fn utf16_column(line: &str, byte: usize) -> u32 {
    let byte = floor_char_boundary(line, byte.min(line.len()));
    line[..byte].chars().map(|c| c.len_utf16() as u32).sum()
}

/// Byte offset of UTF-16 column `column` in `line`, clamped to its length.
/// A column inside a surrogate pair rounds up to the next character.
pub fn byte_offset(line: &str, column: u32) -> usize {
    let mut units = 0u32;
    for (i, c) in line.char_indices() {
        if units >= column {
            return i;
        }
        units += c.len_utf16() as u32;
    }
    line.len()
}

/// Text of line `line`, without its terminator. Out of range lines are empty.
pub fn line_text(text: &str, line: u32) -> &str {
    text.split('\n')
        .nth(line as usize)
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or("")
}

/// The portion of `line` before character `column`.
pub fn prefix_before(line: &str, column: u32) -> &str {
    &line[..byte_offset(line, column)]
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_round_trip_with_multibyte_text() {
        let text = "let é = 1;\nlet x = \"ü\";";
        let index = LineIndex::new(text);
        let offset = text.find('x').unwrap_or_default();
        let pos = index.position(text, offset);
        assert_eq!(pos, Position::new(1, 4));
        assert_eq!(index.offset(text, pos), offset);

        let after = text.find('=').unwrap_or_default();
        assert_eq!(index.position(text, after), Position::new(0, 6));
    }

    #[test]
    fn test_columns_count_utf16_units() {
        let text = "let s = \"😀\"; let x = 1;";
        let index = LineIndex::new(text);
        let offset = text.find('x').unwrap_or_default();
        assert_eq!(index.position(text, offset), Position::new(0, 18));
        assert_eq!(index.offset(text, Position::new(0, 18)), offset);
        assert_eq!(utf16_column(text, text.find('"').unwrap_or_default() + 5), 11);
        // Inside the surrogate pair
        assert_eq!(byte_offset(text, 10), text.find('😀').unwrap_or_default() + '😀'.len_utf8());
    }

    #[test]
    fn test_offsets_are_clamped() {
        let text = "ab\ncd";
        let index = LineIndex::new(text);
        assert_eq!(index.offset(text, Position::new(0, 99)), 2);
        assert_eq!(index.offset(text, Position::new(42, 1)), 4);
        assert_eq!(index.position(text, 999), Position::new(1, 2));
    }

    #[test]
    fn test_line_helpers() {
        let text = "first\r\nsecond";
        assert_eq!(line_text(text, 0), "first");
        assert_eq!(line_text(text, 1), "second");
        assert_eq!(line_text(text, 7), "");
        assert_eq!(prefix_before("Math.max", 5), "Math.");
        assert_eq!(prefix_before("short", 40), "short");
    }
}
