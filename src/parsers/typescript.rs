//! Tree-sitter parsing for UTS sources
//!
//! UTS is a typed superset of the TypeScript surface syntax, so the
//! TypeScript grammar parses it. Parsers are cheap to create and not `Sync`,
//! so one is created per call.

use tracing::trace;
use tree_sitter::{Node, Parser, Tree};

use crate::error::{AnalysisError, AnalysisResult};

/// Parses UTS source text into a syntax tree.
///
/// Syntax errors do not fail the parse; they show up as `ERROR` and missing
/// nodes in the returned tree.
pub fn parse_code(code: &str) -> AnalysisResult<Tree> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())?;
    let tree = parser
        .parse(code, None)
        .ok_or(AnalysisError::NoTree { len: code.len() })?;
    trace!("Parsed {} bytes, has_error={}", code.len(), tree.root_node().has_error());
    Ok(tree)
}

/// Rejects trees nested deeper than `limit` levels.
///
/// The semantic passes walk the tree recursively, so a pathologically nested
/// document is refused up front instead of exhausting the thread's stack.
/// The depth is measured with a cursor, which needs no recursion itself.
pub fn ensure_depth(tree: Tree, limit: usize) -> AnalysisResult<Tree> {
    if exceeds_depth(&tree, limit) {
        return Err(AnalysisError::TooDeep { limit });
    }
    Ok(tree)
}

fn exceeds_depth(tree: &Tree, limit: usize) -> bool {
    let mut cursor = tree.walk();
    let mut depth = 0usize;
    loop {
        if cursor.goto_first_child() {
            depth += 1;
            if depth > limit {
                return true;
            }
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return false;
            }
            depth -= 1;
        }
    }
}

/// Source text covered by `node`.
pub fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    source.get(node.byte_range()).unwrap_or("")
}

/// `node_text` with runs of whitespace collapsed to a single space.
pub fn normalized_text(node: Node<'_>, source: &str) -> String {
    node_text(node, source).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Named children of `node`, collected so callers can iterate without
/// holding a cursor.
pub fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// All children of `node`, including anonymous tokens.
pub fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// Nearest ancestor (excluding `node`) whose kind is in `kinds`.
pub fn ancestor_of_kind<'t>(node: Node<'t>, kinds: &[&str]) -> Option<Node<'t>> {
    let mut current = node.parent();
    while let Some(parent) = current {
        if kinds.contains(&parent.kind()) {
            return Some(parent);
        }
        current = parent.parent();
    }
    None
}
