//! Naive type inference for untyped variable initializers
//!
//! The rules look only at the shape of the right-hand side text and are
//! tried in order; the first that applies wins:
//!
//! | Initializer                 | Type                                   |
//! |-----------------------------|----------------------------------------|
//! | contains a quote character  | `string`                               |
//! | digits only                 | `number`                               |
//! | `true` / `false`            | `boolean`                              |
//! | contains `[` and `]`        | `any[]`                                |
//! | contains `{` and `}`        | `UTSJSONObject`                        |
//! | `new X(...)`                | `X`                                    |
//! | `name(...)`                 | declared return type of `name`, if any |
//! | anything else               | `any`                                  |

use once_cell::sync::Lazy;
use regex::Regex;

use super::SymbolKind;
use super::scanner::find_declaration;

pub const ARRAY_TYPE: &str = "any[]";
pub const OBJECT_TYPE: &str = "UTSJSONObject";
pub const UNKNOWN_TYPE: &str = "any";

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("static pattern"));
static NEW_EXPRESSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^new\s+([A-Za-z_$][\w$]*)").expect("static pattern"));
static CALL_EXPRESSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z_$][\w$]*)\s*\(").expect("static pattern"));

/// Infers the type of `initializer`, using `text` to look up the return
/// types of functions it calls.
pub fn infer_initializer_type(initializer: &str, text: &str) -> String {
    let rhs = initializer.trim().trim_end_matches(';').trim_end();

    if rhs.contains(['"', '\'', '`']) {
        return "string".to_string();
    }
    if DIGITS.is_match(rhs) {
        return "number".to_string();
    }
    if rhs == "true" || rhs == "false" {
        return "boolean".to_string();
    }
    if rhs.contains('[') && rhs.contains(']') {
        return ARRAY_TYPE.to_string();
    }
    if rhs.contains('{') && rhs.contains('}') {
        return OBJECT_TYPE.to_string();
    }
    if let Some(caps) = NEW_EXPRESSION.captures(rhs) {
        return caps[1].to_string();
    }
    if let Some(caps) = CALL_EXPRESSION.captures(rhs) {
        let callee = &caps[1];
        return find_declaration(text, callee, &[SymbolKind::Function, SymbolKind::GenericFunction])
            .and_then(|function| function.declared_type)
            .unwrap_or_else(|| UNKNOWN_TYPE.to_string());
    }

    UNKNOWN_TYPE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn infer(rhs: &str) -> String {
        infer_initializer_type(rhs, "")
    }

    #[test]
    fn test_literal_shapes() {
        assert_eq!(infer("\"hello\""), "string");
        assert_eq!(infer("'single'"), "string");
        assert_eq!(infer("`template ${x}`"), "string");
        assert_eq!(infer("42"), "number");
        assert_eq!(infer("true"), "boolean");
        assert_eq!(infer("false;"), "boolean");
        assert_eq!(infer("[1, 2, 3]"), "any[]");
        assert_eq!(infer("{ a: 1 }"), "UTSJSONObject");
    }

    #[test]
    fn test_digits_only_means_integer_text() {
        assert_eq!(infer("3.14"), "any");
        assert_eq!(infer("-1"), "any");
    }

    #[test]
    fn test_quote_rule_comes_first() {
        assert_eq!(infer("[\"a\", \"b\"]"), "string");
        assert_eq!(infer("new Map([[1, 2]])"), "any[]");
    }

    #[test]
    fn test_constructor_and_call() {
        let text = indoc! {r#"
            function makeId(seed: number): string {
              return "id";
            }
            function noType(x) {}
        "#};
        assert_eq!(infer_initializer_type("new Point(1, 2)", text), "Point");
        assert_eq!(infer_initializer_type("makeId(3)", text), "string");
        assert_eq!(infer_initializer_type("noType(3)", text), "any");
        assert_eq!(infer_initializer_type("missing()", text), "any");
        assert_eq!(infer_initializer_type("someVariable", text), "any");
    }
}
