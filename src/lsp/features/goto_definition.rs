//! Go-to-definition
//!
//! Resolution is lexical: the first line declaring the word as a function,
//! class, interface, variable or constant wins, and the location points at
//! its introducing keyword.

use tower_lsp::lsp_types::{Location, Position, Range, Url};
use tracing::debug;

use crate::lexical::{SymbolKind, find_declaration, word_at};
use crate::parsers::position_utils::line_text;

const DEFINITION_KINDS: &[SymbolKind] = &[
    SymbolKind::GenericFunction,
    SymbolKind::Function,
    SymbolKind::Class,
    SymbolKind::Interface,
    SymbolKind::Variable,
    SymbolKind::Constant,
];

/// Definition of the identifier under `position`.
pub fn goto_definition(uri: &Url, text: &str, position: Position) -> Option<Location> {
    let word = word_at(line_text(text, position.line), position.character)?;
    definition_of(uri, text, &word.text)
}

/// Definition of `word` anywhere in `text`. `word` is matched literally.
pub fn definition_of(uri: &Url, text: &str, word: &str) -> Option<Location> {
    let Some(found) = find_declaration(text, word, DEFINITION_KINDS) else {
        debug!("No definition found for '{}'", word);
        return None;
    };
    let start = Position::new(found.line(), found.keyword_column);
    Some(Location::new(uri.clone(), Range::new(start, start)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn uri() -> Url {
        Url::parse("file:///workspace/main.uts").expect("valid uri")
    }

    #[test]
    fn test_jumps_to_keyword() {
        let text = indoc! {r#"
            import { log } from "./log";

              export function add(a: number, b: number): number {
                return a + b;
              }
            const sum = add(1, 2);
        "#};
        let location = goto_definition(&uri(), text, Position::new(5, 13)).expect("definition");
        assert_eq!(location.range.start, Position::new(2, 9));
        assert_eq!(location.range.start, location.range.end);
        assert_eq!(location.uri, uri());

        let location = goto_definition(&uri(), text, Position::new(5, 7)).expect("definition");
        assert_eq!(location.range.start, Position::new(5, 0));
    }

    #[test]
    fn test_unknown_and_metacharacter_words() {
        let text = "let a = 1;";
        assert!(goto_definition(&uri(), text, Position::new(0, 9)).is_none());
        for word in ["a.b(c)*", "$store", "[", "(?", "\\"] {
            assert!(definition_of(&uri(), text, word).is_none(), "{}", word);
        }
        let text = "let $store = {};";
        let location = definition_of(&uri(), text, "$store").expect("definition");
        assert_eq!(location.range.start, Position::new(0, 0));
    }
}
