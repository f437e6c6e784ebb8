//! Document validation
//!
//! ```text
//! text ──► SemanticModel::diagnostics ──┐
//!                                       ├──► tagged with DIAGNOSTIC_SOURCE
//! text ──► advisory line pass ──────────┘     (advisory: Information only)
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, Position, Range};
use tracing::debug;

use crate::catalog;
use crate::parsers::position_utils::utf16_column;
use crate::semantic::SemanticModel;

pub const DIAGNOSTIC_SOURCE: &str = "UTS Language Server";

static CUSTOM_TYPES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    catalog::CUSTOM_TYPES
        .iter()
        .map(|name| {
            let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(name))).expect("static pattern");
            (*name, pattern)
        })
        .collect()
});
static DECORATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"@(\w+)").expect("static pattern"));
static GENERIC_PARAMETERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<([^>]+)>").expect("static pattern"));

/// Declaration keywords annotated once per line, with their message prefix.
static DECLARATION_KEYWORDS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        ("class", "UTS class definition"),
        ("function", "UTS function definition"),
        ("interface", "UTS interface definition"),
        ("type", "UTS type alias"),
        ("enum", "UTS enum definition"),
        ("namespace", "UTS namespace"),
        ("module", "UTS module"),
    ]
    .into_iter()
    .map(|(keyword, label)| {
        let pattern = Regex::new(&format!(r"\b{}\s+(\w+)", keyword)).expect("static pattern");
        (pattern, label)
    })
    .collect()
});

fn advisory(line_no: u32, line: &str, start: usize, end: usize, message: String) -> Diagnostic {
    Diagnostic {
        range: Range::new(
            Position::new(line_no, utf16_column(line, start)),
            Position::new(line_no, utf16_column(line, end)),
        ),
        severity: Some(DiagnosticSeverity::INFORMATION),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message,
        ..Default::default()
    }
}

/// Annotations for one line: custom types, decorators, generic parameter
/// lists, then the first use of each declaration keyword.
pub fn advisory_line(line_no: u32, line: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for (ty, pattern) in CUSTOM_TYPES.iter() {
        for m in pattern.find_iter(line) {
            diagnostics.push(advisory(line_no, line, m.start(), m.end(), format!("UTS type: {}", ty)));
        }
    }
    for caps in DECORATOR.captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        diagnostics.push(advisory(line_no, line, whole.start(), whole.end(), format!("Decorator: {}", &caps[1])));
    }
    for caps in GENERIC_PARAMETERS.captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        diagnostics.push(advisory(
            line_no,
            line,
            whole.start(),
            whole.end(),
            format!("Generic parameters: {}", &caps[1]),
        ));
    }
    for (pattern, label) in DECLARATION_KEYWORDS.iter() {
        let Some(caps) = pattern.captures(line) else { continue };
        let Some(whole) = caps.get(0) else { continue };
        let keyword_len = whole.as_str().split_whitespace().next().map(str::len).unwrap_or(0);
        diagnostics.push(advisory(
            line_no,
            line,
            whole.start(),
            whole.start() + keyword_len,
            format!("{}: {}", label, &caps[1]),
        ));
    }
    diagnostics
}

/// Advisory annotations for every line of `text`.
pub fn advisory_diagnostics(text: &str) -> Vec<Diagnostic> {
    text.split('\n')
        .enumerate()
        .flat_map(|(i, line)| advisory_line(i as u32, line.strip_suffix('\r').unwrap_or(line)))
        .collect()
}

/// Compiler diagnostics tagged with [`DIAGNOSTIC_SOURCE`], followed by the
/// advisory pass when `advisory` is set.
pub fn validate(text: &str, model: &SemanticModel, advisory: bool) -> Vec<Diagnostic> {
    if !model.is_available() {
        debug!("No compiler diagnostics: semantic model unavailable");
    }
    let mut diagnostics: Vec<Diagnostic> = model
        .diagnostics()
        .into_iter()
        .map(|d| Diagnostic { source: Some(DIAGNOSTIC_SOURCE.to_string()), ..d })
        .collect();
    if advisory {
        diagnostics.extend(advisory_diagnostics(text));
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    #[test]
    fn test_advisory_line() {
        let line = "@Component export class Box<T> { data: UTSJSONObject; more: UTSJSONObject }";
        let diagnostics = advisory_line(2, line);
        assert_eq!(
            messages(&diagnostics),
            vec![
                "UTS type: UTSJSONObject",
                "UTS type: UTSJSONObject",
                "Decorator: Component",
                "Generic parameters: T",
                "UTS class definition: Box",
            ]
        );
        let class = diagnostics.last().expect("class annotation");
        assert_eq!(class.range, Range::new(Position::new(2, 18), Position::new(2, 23)));
        assert!(diagnostics.iter().all(|d| d.severity == Some(DiagnosticSeverity::INFORMATION)));
        assert_eq!(diagnostics[2].range.end, Position::new(2, 10));
    }

    #[test]
    fn test_keywords_need_word_boundary() {
        assert!(advisory_line(0, "let subclass = prototype;").is_empty());
        assert_eq!(
            messages(&advisory_line(0, "  type Id = string;")),
            vec!["UTS type alias: Id"]
        );
    }

    #[test]
    fn test_validate_tags_compiler_diagnostics() {
        let text = "let x: number = \"a\";";
        let model = SemanticModel::build(text);
        let diagnostics = validate(text, &model, false);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(diagnostics[0].source.as_deref(), Some(DIAGNOSTIC_SOURCE));

        let with_advisory = validate("class A {}", &SemanticModel::build("class A {}"), true);
        assert_eq!(messages(&with_advisory), vec!["UTS class definition: A"]);
    }
}
