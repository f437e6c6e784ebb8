//! Find-references
//!
//! Every whole-word, case-sensitive occurrence of the word under the cursor,
//! declaration included. Occurrences inside strings and comments count too.

use tower_lsp::lsp_types::{Location, Position, Url};
use tracing::debug;

use crate::lexical::{find_word_occurrences, word_at};
use crate::parsers::position_utils::{LineIndex, line_text};

/// References to the identifier under `position`.
pub fn find_references(uri: &Url, text: &str, position: Position) -> Vec<Location> {
    match word_at(line_text(text, position.line), position.character) {
        Some(word) => references_to(uri, text, &word.text),
        None => Vec::new(),
    }
}

/// Locations of `word` in `text`, in document order.
pub fn references_to(uri: &Url, text: &str, word: &str) -> Vec<Location> {
    let index = LineIndex::new(text);
    let locations: Vec<Location> = find_word_occurrences(text, word)
        .into_iter()
        .map(|bytes| Location::new(uri.clone(), index.range(text, bytes.start, bytes.end)))
        .collect();
    debug!("{} references to '{}'", locations.len(), word);
    locations
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use tower_lsp::lsp_types::Range;

    fn uri() -> Url {
        Url::parse("file:///workspace/main.uts").expect("valid uri")
    }

    #[test]
    fn test_whole_word_occurrences() {
        let text = indoc! {r#"
            let count = 0;
            count = count + 1;
            let counter = "count";
        "#};
        let locations = find_references(&uri(), text, Position::new(0, 5));
        let ranges: Vec<Range> = locations.iter().map(|l| l.range).collect();
        assert_eq!(
            ranges,
            vec![
                Range::new(Position::new(0, 4), Position::new(0, 9)),
                Range::new(Position::new(1, 0), Position::new(1, 5)),
                Range::new(Position::new(1, 8), Position::new(1, 13)),
                Range::new(Position::new(2, 15), Position::new(2, 20)),
            ]
        );
    }

    #[test]
    fn test_multibyte_columns_and_special_words() {
        let text = "let é = \"ü\"; log($x, $x);";
        let locations = references_to(&uri(), text, "$x");
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].range.start, Position::new(0, 17));

        assert!(references_to(&uri(), text, "a.b(c)*").is_empty());
        assert!(references_to(&uri(), text, "").is_empty());
        assert!(find_references(&uri(), text, Position::new(3, 0)).is_empty());
    }
}
