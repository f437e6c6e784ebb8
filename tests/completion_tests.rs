//! Integration tests for context-aware completion
//!
//! Tests verify:
//! - Member access returns catalog members in catalog order, repeatably
//! - Type positions, call positions and the default list
//! - Local declarations are appended when enabled

use indoc::indoc;
use tower_lsp::lsp_types::{CompletionItem, CompletionItemKind, InsertTextFormat, Position};
use uts_language_server::catalog;
use uts_language_server::config::ServerConfig;
use uts_language_server::lsp::service::UtsLanguageService;

fn labels(items: &[CompletionItem]) -> Vec<String> {
    items.iter().map(|item| item.label.clone()).collect()
}

#[test]
fn test_math_members_in_catalog_order() {
    let service = UtsLanguageService::default();
    let code = "const r = Math.";
    let position = Position::new(0, 15);

    let first = service.complete(code, position, Some("."));
    let expected: Vec<String> = catalog::object_members("Math")
        .unwrap_or_default()
        .iter()
        .map(|m| m.to_string())
        .collect();
    assert_eq!(labels(&first), expected);

    let second = service.complete(code, position, Some("."));
    assert_eq!(first, second, "completion must be repeatable");
}

#[test]
fn test_string_wrapper_methods_carry_signatures() {
    let service = UtsLanguageService::default();
    let items = service.complete("UTSString.", Position::new(0, 10), Some("."));
    let split = items.iter().find(|item| item.label == "split").expect("split method");
    assert_eq!(split.kind, Some(CompletionItemKind::METHOD));
    assert_eq!(split.detail.as_deref(), Some("split(separator: string): string[]"));
}

#[test]
fn test_class_declared_in_document() {
    let service = UtsLanguageService::default();
    let code = indoc! {r#"
        class Cart {
          total(): number { return 0; }
          add(item: string, count: number): void {}
        }
        const cart = new Cart();
        cart.
    "#};
    let items = service.complete(code, Position::new(5, 5), Some("."));
    assert_eq!(labels(&items), vec!["total", "add"]);
}

#[test]
fn test_type_annotation_offers_types_only() {
    let service = UtsLanguageService::default();
    let items = service.complete("let data: ", Position::new(0, 10), Some(" "));
    assert_eq!(items.len(), catalog::TYPES.len());
    assert!(items.iter().all(|item| item.kind == Some(CompletionItemKind::TYPE_PARAMETER)));
    assert!(labels(&items).contains(&"UTSJSONObject".to_string()));
}

#[test]
fn test_call_position_shows_signature() {
    let service = UtsLanguageService::default();
    let items = service.complete("console.log(", Position::new(0, 12), Some("("));
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].label, "console.log(...data: any[]): void");
    assert_eq!(items[0].insert_text.as_deref(), Some(""));
}

#[test]
fn test_default_list_order_and_snippets() {
    let service = UtsLanguageService::default();
    let items = service.complete("", Position::new(0, 0), None);

    let first_type = items.iter().position(|item| item.detail.as_deref() == Some("UTS type"));
    let first_control = items.iter().position(|item| item.detail.as_deref() == Some("UTS control keyword"));
    let first_builtin = items.iter().position(|item| item.detail.as_deref() == Some("UTS built-in function"));
    let first_snippet = items.iter().position(|item| item.kind == Some(CompletionItemKind::SNIPPET));
    assert_eq!(items[0].label, "let");
    assert!(first_type < first_control && first_control < first_builtin && first_builtin < first_snippet);

    let snippets: Vec<_> = items.iter().filter(|item| item.kind == Some(CompletionItemKind::SNIPPET)).collect();
    assert_eq!(snippets.len(), catalog::SNIPPETS.len());
    assert!(snippets.iter().all(|s| s.insert_text_format == Some(InsertTextFormat::SNIPPET)));
}

#[test]
fn test_local_symbols_respect_configuration() {
    let code = indoc! {r#"
        function render(title: string): string {
          let heading = title;

        }
    "#};
    let inside = Position::new(2, 2);

    let service = UtsLanguageService::default();
    let found = labels(&service.complete(code, inside, None));
    assert!(found.contains(&"heading".to_string()));
    assert!(found.contains(&"render".to_string()));

    let service = UtsLanguageService::new(ServerConfig { local_symbol_completions: false, ..ServerConfig::default() });
    let found = labels(&service.complete(code, inside, None));
    assert!(!found.contains(&"heading".to_string()));
}
