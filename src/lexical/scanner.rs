//! Line-oriented declaration scanner
//!
//! Each declaration kind has its own rule, tried against every line in a
//! fixed order. A rule only recognizes a declaration whose keyword and name
//! sit on the same line; declarations split across lines are not reported.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tower_lsp::lsp_types::{Position, Range};
use tracing::debug;

use super::patterns::declaration_pattern;
use super::{SymbolCandidate, SymbolKind};
use crate::catalog;
use crate::parsers::position_utils::utf16_column;

macro_rules! ident {
    () => {
        r"[A-Za-z_$][\w$]*"
    };
}

/// A parameter list, allowing one level of nested parentheses for
/// function-typed parameters.
macro_rules! params {
    () => {
        r"\((?:[^()]|\([^()]*\))*\)"
    };
}

struct Rule {
    kind: SymbolKind,
    pattern: &'static Lazy<Regex>,
}

static GENERIC_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\b(?P<kw>function)\s*\*?\s*(?P<name>", ident!(), r")\s*<[^>]*>\s*", params!(),
        r"\s*(?::\s*(?P<ty>(?:=>|[^{;=])*[^{;=\s]))?"
    ))
    .expect("static pattern")
});

static FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\b(?P<kw>function)\s*\*?\s*(?P<name>", ident!(), r")\s*", params!(),
        r"\s*(?::\s*(?P<ty>(?:=>|[^{;=])*[^{;=\s]))?"
    ))
    .expect("static pattern")
});

static CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(r"\b(?P<kw>class)\s+(?P<name>", ident!(), r")(?:\s*<[^>]*>)?"))
        .expect("static pattern")
});

static INTERFACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(r"\b(?P<kw>interface)\s+(?P<name>", ident!(), r")(?:\s*<[^>]*>)?"))
        .expect("static pattern")
});

static TYPE_ALIAS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\b(?P<kw>type)\s+(?P<name>", ident!(), r")\s*(?:<[^>]*>)?\s*=\s*(?P<ty>[^;]*[^;\s])?"
    ))
    .expect("static pattern")
});

static ENUM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(r"\b(?P<kw>enum)\s+(?P<name>", ident!(), r")")).expect("static pattern")
});

static NAMESPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\b(?P<kw>namespace)\s+(?P<name>", ident!(), r"(?:\.", ident!(), r")*)"
    ))
    .expect("static pattern")
});

static MODULE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(r"\b(?P<kw>module)\s+(?P<name>", ident!(), r")")).expect("static pattern")
});

static VARIABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\b(?P<kw>let|const|var)\s+(?P<name>", ident!(), r")",
        r"\s*(?::\s*(?P<ty>(?:=>|[^=;])*[^=;\s]))?",
        r"\s*(?:=\s*(?P<init>[^;]*[^;\s]))?"
    ))
    .expect("static pattern")
});

static METHOD_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^\s*(?:(?:public|private|protected|static|async|readonly|override|abstract)\s+)*",
        r"(?P<name>", ident!(), r")\s*\((?P<params>[^)]*)\)\s*:\s*(?P<ty>[^{;]*[^{;\s])"
    ))
    .expect("static pattern")
});

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule { kind: SymbolKind::GenericFunction, pattern: &GENERIC_FUNCTION },
        Rule { kind: SymbolKind::Function, pattern: &FUNCTION },
        Rule { kind: SymbolKind::Class, pattern: &CLASS },
        Rule { kind: SymbolKind::Interface, pattern: &INTERFACE },
        Rule { kind: SymbolKind::TypeAlias, pattern: &TYPE_ALIAS },
        Rule { kind: SymbolKind::Enum, pattern: &ENUM },
        Rule { kind: SymbolKind::Namespace, pattern: &NAMESPACE },
        Rule { kind: SymbolKind::Module, pattern: &MODULE },
        Rule { kind: SymbolKind::Variable, pattern: &VARIABLE },
    ]
});

fn is_comment_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*')
}

fn lines(text: &str) -> impl Iterator<Item = (u32, &str)> {
    text.split('\n')
        .enumerate()
        .map(|(i, line)| (i as u32, line.strip_suffix('\r').unwrap_or(line)))
}

/// Scans the whole document, ordered by line and then by rule.
pub fn scan(text: &str) -> Vec<SymbolCandidate> {
    let candidates: Vec<_> = lines(text)
        .flat_map(|(line_no, line)| scan_line(line_no, line))
        .collect();
    debug!("Lexical scan found {} declarations", candidates.len());
    candidates
}

fn scan_line(line_no: u32, line: &str) -> Vec<SymbolCandidate> {
    if is_comment_line(line) {
        return Vec::new();
    }

    RULES
        .iter()
        .filter_map(|rule| {
            let caps = rule.pattern.captures(line)?;
            Some(candidate(rule.kind, line_no, line, &caps))
        })
        .collect()
}

fn candidate(rule_kind: SymbolKind, line_no: u32, line: &str, caps: &Captures<'_>) -> SymbolCandidate {
    let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
    let keyword = caps.name("kw").map(|m| (m.start(), m.as_str())).unwrap_or((whole.start, ""));
    let name = caps.name("name").map(|m| m.range()).unwrap_or(whole.clone());
    let declared_type = caps.name("ty").map(|m| m.as_str().trim().to_string());
    let initializer = caps.name("init").map(|m| m.as_str().trim().to_string());

    let kind = match (rule_kind, keyword.1) {
        (SymbolKind::Variable, "const") => SymbolKind::Constant,
        (kind, _) => kind,
    };

    // Variable headers stop before the initializer.
    let signature_end = if kind.is_variable() {
        caps.name("ty").map(|m| m.end()).unwrap_or(name.end)
    } else {
        whole.end
    };

    let column = |byte: usize| utf16_column(line, byte);
    let first_non_blank = line.len() - line.trim_start().len();

    SymbolCandidate {
        name: line[name.clone()].to_string(),
        kind,
        range: Range::new(
            Position::new(line_no, column(first_non_blank)),
            Position::new(line_no, column(line.trim_end().len())),
        ),
        selection_range: Range::new(
            Position::new(line_no, column(name.start)),
            Position::new(line_no, column(name.end)),
        ),
        keyword_column: column(keyword.0),
        declared_type,
        initializer,
        signature: line[keyword.0..signature_end].trim().to_string(),
    }
}

/// First declaration of `name` among `kinds`, scanning top to bottom.
///
/// Within a line the rule order decides, so `function id<T>` is reported as a
/// generic function rather than a plain one.
pub fn find_declaration(text: &str, name: &str, kinds: &[SymbolKind]) -> Option<SymbolCandidate> {
    lines(text)
        .filter(|(_, line)| line.contains(name))
        .flat_map(|(line_no, line)| scan_line(line_no, line))
        .find(|candidate| candidate.name == name && kinds.contains(&candidate.kind))
}

/// A method header recognized inside a class body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodLine {
    pub name: String,
    pub params: String,
    pub return_type: String,
}

impl MethodLine {
    /// `(params): returnType`
    pub fn signature(&self) -> String {
        format!("({}): {}", self.params.trim(), self.return_type)
    }
}

/// Methods of the first `class <class_name>` declaration in the document.
///
/// The body is read from the line after the class header up to the first
/// line that is exactly `}` once trimmed. Only methods with an explicit
/// return type are recognized.
pub fn class_body_methods(text: &str, class_name: &str) -> Vec<MethodLine> {
    let header = match declaration_pattern("class", class_name) {
        Ok(pattern) => pattern,
        Err(e) => {
            debug!("Class body scan skipped: {}", e);
            return Vec::new();
        }
    };

    let body = lines(text)
        .skip_while(|(_, line)| !header.is_match(line))
        .skip(1)
        .take_while(|(_, line)| line.trim() != "}");

    let mut methods = Vec::new();
    for (_, line) in body {
        let Some(caps) = METHOD_LINE.captures(line) else {
            continue;
        };
        let name = &caps["name"];
        if catalog::is_control_keyword(name) || name == "constructor" {
            continue;
        }
        methods.push(MethodLine {
            name: name.to_string(),
            params: caps["params"].to_string(),
            return_type: caps["ty"].trim().to_string(),
        });
    }
    methods
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn kinds(candidates: &[SymbolCandidate]) -> Vec<(&str, SymbolKind)> {
        candidates.iter().map(|c| (c.name.as_str(), c.kind)).collect()
    }

    #[test]
    fn test_scan_each_kind() {
        let text = indoc! {r#"
            function add(a: number, b: number): number {
            function identity<T>(value: T): T {
            class Point {
            interface Shape {
            type Id = string | number;
            enum Color { Red, Green }
            namespace App.Utils {
            module Legacy {
            let count: number = 0;
            const name = "uts";
            var flag = true;
        "#};
        let candidates = scan(text);
        assert_eq!(
            kinds(&candidates),
            vec![
                ("add", SymbolKind::Function),
                ("identity", SymbolKind::GenericFunction),
                ("Point", SymbolKind::Class),
                ("Shape", SymbolKind::Interface),
                ("Id", SymbolKind::TypeAlias),
                ("Color", SymbolKind::Enum),
                ("App.Utils", SymbolKind::Namespace),
                ("Legacy", SymbolKind::Module),
                ("count", SymbolKind::Variable),
                ("name", SymbolKind::Constant),
                ("flag", SymbolKind::Variable),
            ]
        );
    }

    #[test]
    fn test_declared_types_and_signatures() {
        let text = indoc! {r#"
            export function add(a: number, b: number): number {
            let handler: (e: string) => void = noop;
            type Id = string | number;
            const greeting = "hello";
        "#};
        let candidates = scan(text);

        assert_eq!(candidates[0].declared_type.as_deref(), Some("number"));
        assert_eq!(candidates[0].signature, "function add(a: number, b: number): number");
        assert_eq!(candidates[0].keyword_column, 7);

        assert_eq!(candidates[1].declared_type.as_deref(), Some("(e: string) => void"));
        assert_eq!(candidates[1].initializer.as_deref(), Some("noop"));
        assert_eq!(candidates[1].signature, "let handler: (e: string) => void");

        assert_eq!(candidates[2].declared_type.as_deref(), Some("string | number"));

        assert_eq!(candidates[3].declared_type, None);
        assert_eq!(candidates[3].initializer.as_deref(), Some("\"hello\""));
        assert_eq!(candidates[3].signature, "const greeting");
    }

    #[test]
    fn test_function_types_in_signatures() {
        let candidates = scan("function run(cb: () => void, n: number): (() => void) {");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].declared_type.as_deref(), Some("(() => void)"));
        assert_eq!(candidates[0].signature, "function run(cb: () => void, n: number): (() => void)");
    }

    #[test]
    fn test_ranges() {
        let candidates = scan("  let value = 1;  ");
        let c = &candidates[0];
        assert_eq!(c.range, Range::new(Position::new(0, 2), Position::new(0, 16)));
        assert_eq!(c.selection_range, Range::new(Position::new(0, 6), Position::new(0, 11)));
        assert_eq!(c.keyword_column, 2);
    }

    #[test]
    fn test_multi_line_declaration_not_recognized() {
        let text = "function\nsplit(a: number) {}";
        assert!(scan(text).is_empty());
    }

    #[test]
    fn test_comment_lines_skipped() {
        let text = "// function ghost() {}\n * class Phantom\nlet real = 1;";
        assert_eq!(kinds(&scan(text)), vec![("real", SymbolKind::Variable)]);
    }

    #[test]
    fn test_find_declaration_first_match_wins() {
        let text = indoc! {r#"
            let total = 0;
            function total() {}
        "#};
        let found = find_declaration(text, "total", SymbolKind::ALL).expect("declared");
        assert_eq!(found.kind, SymbolKind::Variable);
        assert_eq!(found.line(), 0);

        let function = find_declaration(text, "total", &[SymbolKind::Function]).expect("declared");
        assert_eq!(function.line(), 1);
        assert!(find_declaration(text, "tot", SymbolKind::ALL).is_none());
    }

    #[test]
    fn test_class_body_methods() {
        let text = indoc! {r#"
            class Calculator {
                private total: number = 0;
                constructor(start: number) { this.total = start; }
                add(value: number): Calculator { this.total += value; return this; }
                async reset(): Promise<void> {
                    if (this.total > 0) { this.total = 0; }
                }
                subtract(value: number): Calculator { return this; }
            }
        "#};
        let methods = class_body_methods(text, "Calculator");
        let names: Vec<_> = methods.iter().map(|m| m.name.as_str()).collect();
        // The body ends at the first lone closing brace, which closes `reset`.
        assert_eq!(names, vec!["add", "reset"]);
        assert_eq!(methods[0].signature(), "(value: number): Calculator");
        assert_eq!(methods[1].return_type, "Promise<void>");
    }

    #[test]
    fn test_class_body_unknown_class() {
        assert!(class_body_methods("class A {\n  f(): void {}\n}", "B").is_empty());
    }
}
