//! Word extraction and literal search patterns
//!
//! Any text taken from the document and turned into a regular expression
//! goes through [`literal_word_pattern`] or [`declaration_pattern`], which
//! escape it first. A word such as `$store` or a selection like `a.b(c)*`
//! is therefore always searched for literally.

use std::ops::Range;

use regex::Regex;
use tracing::debug;

use crate::error::{AnalysisError, AnalysisResult};
use crate::parsers::position_utils::{byte_offset, utf16_column};

/// Characters that may appear in a UTS identifier.
pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// A regex matching `word` literally.
pub fn literal_word_pattern(word: &str) -> AnalysisResult<Regex> {
    compile(word, &regex::escape(word))
}

/// A regex matching `<keyword> <word>` where `keyword_alternatives` is a
/// fixed alternation such as `let|const|var`, and `word` is escaped. The
/// keyword is captured as group 1.
pub fn declaration_pattern(keyword_alternatives: &str, word: &str) -> AnalysisResult<Regex> {
    let pattern = format!(
        r"\b({})\s+{}(?:$|[^\w$])",
        keyword_alternatives,
        regex::escape(word)
    );
    compile(word, &pattern)
}

fn compile(word: &str, pattern: &str) -> AnalysisResult<Regex> {
    Regex::new(pattern).map_err(|source| AnalysisError::Pattern {
        word: word.to_string(),
        source,
    })
}

/// Byte ranges of every occurrence of `word` in `text` that is not part of a
/// longer identifier.
pub fn find_word_occurrences(text: &str, word: &str) -> Vec<Range<usize>> {
    if word.is_empty() {
        return Vec::new();
    }

    let pattern = match literal_word_pattern(word) {
        Ok(pattern) => pattern,
        Err(e) => {
            debug!("No occurrences searched: {}", e);
            return Vec::new();
        }
    };

    pattern
        .find_iter(text)
        .filter(|m| {
            let before = text[..m.start()].chars().next_back();
            let after = text[m.end()..].chars().next();
            !before.is_some_and(is_identifier_char) && !after.is_some_and(is_identifier_char)
        })
        .map(|m| m.range())
        .collect()
}

/// The identifier under or immediately before a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordAt {
    pub text: String,
    /// Start column (UTF-16 units).
    pub start: u32,
    /// End column, exclusive (UTF-16 units).
    pub end: u32,
}

/// Finds the identifier touching `column` on `line`.
///
/// A cursor sitting right after the last character of a word still selects
/// that word.
pub fn word_at(line: &str, column: u32) -> Option<WordAt> {
    let cursor = byte_offset(line, column);

    let start = line[..cursor]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_identifier_char(*c))
        .last()
        .map(|(i, _)| i)
        .unwrap_or(cursor);
    let end = line[cursor..]
        .char_indices()
        .find(|(_, c)| !is_identifier_char(*c))
        .map(|(i, _)| cursor + i)
        .unwrap_or(line.len());

    if start == end {
        return None;
    }

    Some(WordAt {
        text: line[start..end].to_string(),
        start: utf16_column(line, start),
        end: utf16_column(line, end),
    })
}

/// The identifier ending right before `.` that precedes `word`, if any.
/// For `console.log` with the cursor on `log`, returns `console`.
pub fn receiver_before(line: &str, word: &WordAt) -> Option<String> {
    let start = byte_offset(line, word.start);
    let before = line[..start].strip_suffix('.')?;
    let receiver_start = before
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_identifier_char(*c))
        .last()
        .map(|(i, _)| i)?;
    Some(before[receiver_start..].to_string())
}

/// True when the next non-blank character after `word` is `(`.
pub fn followed_by_call(line: &str, word: &WordAt) -> bool {
    let end = byte_offset(line, word.end);
    line[end..].trim_start().starts_with('(')
}
