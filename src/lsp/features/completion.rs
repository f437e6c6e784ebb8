//! Context-aware completion
//!
//! ```text
//! classify(line, column)
//!   ├─ MemberAccess  → first non-empty member source, else Default
//!   ├─ TypePosition  → built-in types
//!   ├─ CallPosition  → catalogued signature, else Default
//!   └─ Default       → keywords, types, control keywords, built-ins,
//!                      snippets, then local declarations
//! ```
//!
//! Items are unique by (label, kind) and keep catalog order.

use rustc_hash::FxHashSet;
use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, Documentation, InsertTextFormat, Position,
};
use tracing::debug;

use crate::catalog;
use crate::lsp::features::context::{CompletionContext, classify};
use crate::lsp::features::sources::{MEMBER_SOURCES, Query, first_members, symbol_completion_kind};
use crate::parsers::position_utils::line_text;
use crate::semantic::SemanticModel;

/// Request-independent switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionOptions {
    /// Append declarations visible at the cursor to default completions.
    pub local_symbols: bool,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self { local_symbols: true }
    }
}

/// Completion items for `position` in `text`.
pub fn complete(
    text: &str,
    position: Position,
    model: &SemanticModel,
    options: CompletionOptions,
) -> Vec<CompletionItem> {
    let line = line_text(text, position.line);
    let context = classify(line, position.character);
    debug!("Completion context at {:?}: {:?}", position, context);

    let items = match &context {
        CompletionContext::MemberAccess { receiver } => {
            let query = Query { text, position, line, model };
            let members = first_members(MEMBER_SOURCES, &query, receiver);
            if members.is_empty() {
                default_items(position, model, options)
            } else {
                members
                    .into_iter()
                    .map(|member| CompletionItem {
                        kind: Some(member.kind.completion_kind()),
                        detail: member.signature,
                        documentation: member.documentation.map(Documentation::String),
                        label: member.name,
                        ..Default::default()
                    })
                    .collect()
            }
        }
        CompletionContext::TypePosition => type_items(),
        CompletionContext::CallPosition { callee, .. } => {
            let signature = context
                .qualified_callee()
                .and_then(|name| catalog::function_signature(&name))
                .or_else(|| catalog::function_signature(callee));
            match signature {
                Some(sig) => vec![CompletionItem {
                    label: sig.label(),
                    kind: Some(CompletionItemKind::FUNCTION),
                    detail: Some(format!("{} signature", sig.name)),
                    documentation: Some(Documentation::String(sig.description.to_string())),
                    // The signature is informational; accepting it inserts nothing.
                    insert_text: Some(String::new()),
                    ..Default::default()
                }],
                None => default_items(position, model, options),
            }
        }
        CompletionContext::Default => default_items(position, model, options),
    };

    dedupe(items)
}

fn keyword_item(label: &str, kind: CompletionItemKind, detail: &str) -> CompletionItem {
    CompletionItem {
        label: label.to_string(),
        kind: Some(kind),
        detail: Some(detail.to_string()),
        ..Default::default()
    }
}

fn type_items() -> Vec<CompletionItem> {
    catalog::TYPES
        .iter()
        .map(|entry| CompletionItem {
            documentation: Some(Documentation::String(entry.description.to_string())),
            ..keyword_item(entry.name, CompletionItemKind::TYPE_PARAMETER, "UTS type")
        })
        .collect()
}

fn default_items(position: Position, model: &SemanticModel, options: CompletionOptions) -> Vec<CompletionItem> {
    let mut items: Vec<CompletionItem> = catalog::KEYWORDS
        .iter()
        .map(|keyword| keyword_item(keyword, CompletionItemKind::KEYWORD, "UTS keyword"))
        .collect();
    items.extend(type_items());
    items.extend(
        catalog::CONTROL_KEYWORDS
            .iter()
            .map(|keyword| keyword_item(keyword, CompletionItemKind::KEYWORD, "UTS control keyword")),
    );
    items.extend(
        catalog::BUILTIN_FUNCTIONS
            .iter()
            .map(|function| keyword_item(function, CompletionItemKind::FUNCTION, "UTS built-in function")),
    );
    items.extend(catalog::SNIPPETS.iter().map(|snippet| CompletionItem {
        insert_text: Some(snippet.template.to_string()),
        insert_text_format: Some(InsertTextFormat::SNIPPET),
        ..keyword_item(snippet.label, CompletionItemKind::SNIPPET, snippet.detail)
    }));

    if options.local_symbols {
        items.extend(model.symbols_in_scope(position, &[]).into_iter().map(|symbol| CompletionItem {
            label: symbol.name,
            kind: Some(symbol_completion_kind(symbol.kind)),
            detail: Some(symbol.type_text),
            ..Default::default()
        }));
    }
    items
}

fn dedupe(items: Vec<CompletionItem>) -> Vec<CompletionItem> {
    let mut seen = FxHashSet::default();
    items
        .into_iter()
        .filter(|item| seen.insert((item.label.clone(), item.kind.map(|k| format!("{:?}", k)))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn labels(items: &[CompletionItem]) -> Vec<&str> {
        items.iter().map(|item| item.label.as_str()).collect()
    }

    fn complete_at_end(text: &str) -> Vec<CompletionItem> {
        let model = SemanticModel::build(text);
        let line = text.split('\n').count() as u32 - 1;
        let column = text.split('\n').last().unwrap_or("").chars().count() as u32;
        complete(text, Position::new(line, column), &model, CompletionOptions::default())
    }

    #[test]
    fn test_member_access_uses_catalog_order() {
        let items = complete_at_end("const n = Math.");
        assert_eq!(
            labels(&items),
            vec!["abs", "ceil", "floor", "round", "max", "min", "pow", "sqrt", "random"]
        );
        assert!(items.iter().all(|item| item.kind == Some(CompletionItemKind::METHOD)));
    }

    #[test]
    fn test_unknown_receiver_falls_back_to_default() {
        let items = complete_at_end("mystery.");
        assert_eq!(items.first().map(|item| item.label.as_str()), Some("let"));
    }

    #[test]
    fn test_type_position() {
        let items = complete_at_end("let name: ");
        assert_eq!(items.len(), catalog::TYPES.len());
        assert_eq!(items[0].label, "string");
        assert_eq!(items[0].detail.as_deref(), Some("UTS type"));
    }

    #[test]
    fn test_call_position_signature() {
        let items = complete_at_end("let n = parseInt(");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "parseInt(string: string, radix?: number): number");
        assert_eq!(items[0].insert_text.as_deref(), Some(""));

        let items = complete_at_end("Math.max(");
        assert_eq!(items[0].label, "Math.max(...values: number[]): number");

        let items = complete_at_end("unknownCall(");
        assert!(items.len() > 1);
    }

    #[test]
    fn test_default_is_deduplicated_and_has_snippets() {
        let items = complete_at_end("");
        let defaults: Vec<_> = items
            .iter()
            .filter(|item| item.label == "default" && item.kind == Some(CompletionItemKind::KEYWORD))
            .collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].detail.as_deref(), Some("UTS keyword"));

        let snippet = items
            .iter()
            .find(|item| item.kind == Some(CompletionItemKind::SNIPPET) && item.label == "function")
            .expect("function snippet");
        assert_eq!(snippet.insert_text_format, Some(InsertTextFormat::SNIPPET));
    }

    #[test]
    fn test_local_symbols_follow_catalog_entries() {
        let text = indoc! {r#"
            function greet(name: string): string {
              return name;
            }
            let count = 1;
        "#};
        let model = SemanticModel::build(text);
        let position = Position::new(4, 0);

        let items = complete(text, position, &model, CompletionOptions::default());
        let greet = items.iter().find(|item| item.label == "greet").expect("local function");
        assert_eq!(greet.kind, Some(CompletionItemKind::FUNCTION));
        assert_eq!(greet.detail.as_deref(), Some("(name: string) => string"));
        assert!(items.iter().position(|item| item.label == "count") > items.iter().position(|item| item.label == "let"));

        let items = complete(text, position, &model, CompletionOptions { local_symbols: false });
        assert!(!labels(&items).contains(&"greet"));
    }
}
