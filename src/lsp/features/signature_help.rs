//! Signature help for the call enclosing the cursor
//!
//! Only the current line is inspected. The innermost unclosed `(` before the
//! cursor names the callee; the number of top-level commas after it selects
//! the active parameter.

use once_cell::sync::Lazy;
use regex::Regex;
use tower_lsp::lsp_types::{
    Documentation, ParameterInformation, ParameterLabel, Position, SignatureHelp,
    SignatureInformation,
};
use tracing::debug;

use crate::catalog;
use crate::lexical::{SymbolKind, find_declaration};
use crate::parsers::position_utils::{line_text, prefix_before};

static CALLEE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"((?:[\w$]+\.)?[\w$]+)\s*$").expect("static pattern"));

/// The call surrounding the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveCall {
    /// Possibly qualified callee, e.g. `Math.max`.
    pub callee: String,
    pub active_parameter: u32,
}

/// Finds the innermost open call in `before`, the line text up to the cursor.
pub fn active_call(before: &str) -> Option<ActiveCall> {
    let mut depth = 0usize;
    let mut commas = 0u32;
    let mut in_string: Option<char> = None;
    let chars: Vec<(usize, char)> = before.char_indices().collect();

    // Walk backwards; brackets closed after the open paren are skipped.
    for &(index, c) in chars.iter().rev() {
        if let Some(quote) = in_string {
            if c == quote {
                in_string = None;
            }
            continue;
        }
        match c {
            '"' | '\'' | '`' => in_string = Some(c),
            ')' | ']' | '}' => depth += 1,
            '[' | '{' if depth > 0 => depth -= 1,
            '[' | '{' => return None,
            '(' if depth > 0 => depth -= 1,
            '(' => {
                let caps = CALLEE.captures(&before[..index])?;
                return Some(ActiveCall { callee: caps[1].to_string(), active_parameter: commas });
            }
            ',' if depth == 0 => commas += 1,
            _ => {}
        }
    }
    None
}

/// Splits a parameter list on commas that are not nested in brackets.
pub fn split_parameters(params: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();
    for c in params.chars() {
        match c {
            '(' | '[' | '{' | '<' => depth += 1,
            // `=>` is an arrow, not a closing angle bracket.
            '>' if current.ends_with('=') => {}
            ')' | ']' | '}' | '>' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

fn information(label: String, parameters: Vec<String>, documentation: Option<String>) -> SignatureInformation {
    SignatureInformation {
        label,
        documentation: documentation.map(Documentation::String),
        parameters: Some(
            parameters
                .into_iter()
                .map(|p| ParameterInformation { label: ParameterLabel::Simple(p), documentation: None })
                .collect(),
        ),
        active_parameter: None,
    }
}

/// Text between the parentheses of the parameter list in `label`, e.g.
/// `a: number` for `f<T>(a: number): (() => T)`. Type parameters before the
/// list and parentheses in the return type are skipped.
pub fn parameter_list(label: &str) -> Option<&str> {
    let mut angle = 0i32;
    let mut open: Option<usize> = None;
    let mut depth = 0usize;
    let mut previous = ' ';
    for (index, c) in label.char_indices() {
        match open {
            None => match c {
                '<' => angle += 1,
                '>' if previous != '=' => angle -= 1,
                '(' if angle <= 0 => {
                    open = Some(index);
                    depth = 1;
                }
                _ => {}
            },
            Some(start) => match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return label.get(start + 1..index);
                    }
                }
                _ => {}
            },
        }
        previous = c;
    }
    None
}

fn document_signature(text: &str, callee: &str) -> Option<SignatureInformation> {
    let name = callee.rsplit('.').next().unwrap_or(callee);
    let found = find_declaration(text, name, &[SymbolKind::GenericFunction, SymbolKind::Function])?;
    let label = found.signature.strip_prefix("function").unwrap_or(&found.signature).trim().to_string();
    let parameters = split_parameters(parameter_list(&label)?);
    Some(information(label, parameters, None))
}

/// Signature help at `position`.
pub fn signature_help(text: &str, position: Position) -> Option<SignatureHelp> {
    let line = line_text(text, position.line);
    let call = active_call(prefix_before(line, position.character))?;

    let signature = catalog::function_signature(&call.callee)
        .map(|sig| {
            information(
                sig.label(),
                sig.parameters.iter().map(|p| p.to_string()).collect(),
                Some(sig.description.to_string()),
            )
        })
        .or_else(|| document_signature(text, &call.callee));
    let Some(signature) = signature else {
        debug!("No signature for '{}'", call.callee);
        return None;
    };

    Some(SignatureHelp {
        signatures: vec![signature],
        active_signature: Some(0),
        active_parameter: Some(call.active_parameter),
    })
}
