//! Document outline from the lexical scanner

use tower_lsp::lsp_types::{Location, SymbolInformation, SymbolKind as LspSymbolKind, Url};

use crate::lexical::{SymbolKind, scan};

fn lsp_kind(kind: SymbolKind) -> LspSymbolKind {
    match kind {
        SymbolKind::Function | SymbolKind::GenericFunction => LspSymbolKind::FUNCTION,
        SymbolKind::Class => LspSymbolKind::CLASS,
        SymbolKind::Interface => LspSymbolKind::INTERFACE,
        SymbolKind::TypeAlias => LspSymbolKind::TYPE_PARAMETER,
        SymbolKind::Enum => LspSymbolKind::ENUM,
        SymbolKind::Namespace => LspSymbolKind::NAMESPACE,
        SymbolKind::Module => LspSymbolKind::MODULE,
        SymbolKind::Variable => LspSymbolKind::VARIABLE,
        SymbolKind::Constant => LspSymbolKind::CONSTANT,
    }
}

/// Flat list of declarations, one per rule match, in line order.
pub fn document_symbols(uri: &Url, text: &str) -> Vec<SymbolInformation> {
    scan(text)
        .into_iter()
        .map(|candidate| {
            #[allow(deprecated)]
            SymbolInformation {
                name: candidate.name,
                kind: lsp_kind(candidate.kind),
                tags: None,
                deprecated: None,
                location: Location::new(uri.clone(), candidate.range),
                container_name: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use tower_lsp::lsp_types::{Position, Range};

    #[test]
    fn test_outline() {
        let uri = Url::parse("file:///workspace/main.uts").expect("valid uri");
        let text = indoc! {r#"
            // class Commented {
            namespace App.Utils {
              export interface Shape {}
              function identity<T>(value: T): T { return value; }
            }
            const LIMIT = 10;
        "#};
        let symbols = document_symbols(&uri, text);
        let summary: Vec<_> = symbols.iter().map(|s| (s.name.as_str(), s.kind)).collect();
        assert_eq!(
            summary,
            vec![
                ("App.Utils", LspSymbolKind::NAMESPACE),
                ("Shape", LspSymbolKind::INTERFACE),
                ("identity", LspSymbolKind::FUNCTION),
                ("LIMIT", LspSymbolKind::CONSTANT),
            ]
        );
        assert_eq!(
            symbols[1].location.range,
            Range::new(Position::new(2, 2), Position::new(2, 27))
        );
    }
}
