//! Integration tests for hover
//!
//! Tests verify the layer order (semantic model, signature catalog, lexical
//! scan, vocabulary) and the inferred types shown for untyped variables.

use indoc::indoc;
use tower_lsp::lsp_types::{HoverContents, Position};
use uts_language_server::lsp::service::UtsLanguageService;

fn hover_text(service: &UtsLanguageService, code: &str, line: u32, character: u32) -> Option<String> {
    service.hover(code, Position::new(line, character)).map(|hover| match hover.contents {
        HoverContents::Markup(markup) => markup.value,
        other => panic!("unexpected hover contents: {:?}", other),
    })
}

#[test]
fn test_inferred_variable_types() {
    let service = UtsLanguageService::default();
    let code = indoc! {r#"
        let title = "Checkout";
        let count = 3;
        let ready = false;
        let rows = [];
    "#};
    let cases = [(0, "string"), (1, "number"), (2, "boolean"), (3, "any[]")];
    for (line, expected) in cases {
        let text = hover_text(&service, code, line, 5).expect("hover");
        assert!(text.contains(&format!(": {}", expected)), "line {}: {}", line, text);
    }
}

#[test]
fn test_lexical_layer_answers_outside_code() {
    let service = UtsLanguageService::default();
    let code = indoc! {r#"
        let greeting = "hi";
        // greeting is shown on the home page
    "#};
    let text = hover_text(&service, code, 1, 5).expect("hover");
    assert!(text.starts_with("**greeting** - variable"), "{}", text);
    assert!(text.contains("```uts\nlet greeting: string\n```"));
    assert!(text.contains("Declared on line 1."));
}

#[test]
fn test_catalog_before_vocabulary() {
    let service = UtsLanguageService::default();
    let text = hover_text(&service, "const n = parseInt(\"7\");", 0, 12).expect("hover");
    assert!(text.starts_with("**parseInt** - function"), "{}", text);
    assert!(text.contains("Parses a string and returns an integer."));

    let text = hover_text(&service, "let x: UTSJSONObject;", 0, 10).expect("hover");
    assert!(text.contains("UTSJSONObject"));

    let text = hover_text(&service, "interface", 0, 3).expect("hover");
    assert!(text.starts_with("**interface** - UTS keyword"), "{}", text);
}

#[test]
fn test_class_members() {
    let service = UtsLanguageService::default();
    let code = indoc! {r#"
        class Point {
          x: number = 0;
          move(dx: number): void {}
        }
        const p = new Point();
        p.move(1);
    "#};
    let text = hover_text(&service, code, 5, 3).expect("hover");
    assert!(text.starts_with("**move** - method"), "{}", text);
    assert!(text.contains("(dx: number) => void"));

    let text = hover_text(&service, code, 4, 6).expect("hover");
    assert!(text.contains("(constant) p: Point"), "{}", text);
}

#[test]
fn test_nothing_to_say() {
    let service = UtsLanguageService::default();
    assert!(hover_text(&service, "let a = 1;", 4, 0).is_none());
    assert!(hover_text(&service, "  ;  ", 0, 3).is_none());
}

#[test]
fn test_local_class_shadows_catalog_type() {
    let service = UtsLanguageService::default();
    let catalog_description = "UTS dynamic JSON object with keyed access helpers.";
    let code = indoc! {r#"
        class UTSJSONObject {}
        let data: UTSJSONObject = new UTSJSONObject();
    "#};

    let text = hover_text(&service, code, 0, 8).expect("hover");
    assert!(text.starts_with("**UTSJSONObject** - class"), "{}", text);
    assert!(!text.contains(catalog_description), "{}", text);

    let text = hover_text(&service, code, 1, 14).expect("hover");
    assert!(text.starts_with("**UTSJSONObject** - class"), "{}", text);
    assert!(!text.contains(catalog_description), "{}", text);

    let text = hover_text(&service, "let data: UTSJSONObject;", 0, 14).expect("hover");
    assert!(text.starts_with("**UTSJSONObject** - UTS type"), "{}", text);
    assert!(text.contains(catalog_description), "{}", text);
}
