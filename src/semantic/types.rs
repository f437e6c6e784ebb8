//! Type strings for declarations and expressions
//!
//! Types are rendered the way TypeScript prints them (`number`,
//! `string[]`, `(a: number) => void`, `typeof Point`). Literal types are
//! always widened: `let x = "a"` has type `string`, never `"a"`.
//!
//! Declarations may depend on each other (`let b = a;`), so types are
//! resolved on demand with memoisation; a cycle resolves to `any`.

use tree_sitter::Node;

use super::binder::{Bindings, DeclId, FUNCTION_LIKE, MemberKind, Space, TypeSource, annotation_text};
use crate::catalog;
use crate::lexical::inference::{OBJECT_TYPE, UNKNOWN_TYPE};
use crate::parsers::typescript::{children, named_children, node_text, normalized_text};

/// Resolves every declaration and member type in `bindings`.
pub fn resolve_all(bindings: &mut Bindings, root: Node<'_>, source: &str) {
    let count = bindings.declarations.len();
    let mut resolver = Resolver {
        bindings,
        root,
        source,
        memo: vec![None; count],
        in_progress: vec![false; count],
    };

    let mut resolved = Vec::with_capacity(count);
    for id in 0..count {
        resolved.push(resolver.declaration_type(id));
    }

    let mut member_types = Vec::with_capacity(count);
    for id in 0..count {
        let sources: Vec<TypeSource> = resolver.bindings.declarations[id]
            .members
            .iter()
            .map(|m| m.source.clone())
            .collect();
        member_types.push(sources.iter().map(|s| resolver.source_type(s)).collect::<Vec<_>>());
    }

    for (id, (type_text, members)) in resolved.into_iter().zip(member_types).enumerate() {
        let declaration = &mut bindings.declarations[id];
        declaration.type_text = type_text;
        for (member, type_text) in declaration.members.iter_mut().zip(members) {
            member.type_text = type_text;
        }
    }
}

/// Computes types against an already resolved [`Bindings`].
pub fn expression_type_resolved(node: Node<'_>, source: &str, bindings: &Bindings) -> String {
    let mut lookup = |id: DeclId| bindings.get(id).type_text.clone();
    expression_type(node, source, bindings, &mut lookup, 0)
}

struct Resolver<'a, 't> {
    bindings: &'a Bindings,
    root: Node<'t>,
    source: &'a str,
    memo: Vec<Option<String>>,
    in_progress: Vec<bool>,
}

impl Resolver<'_, '_> {
    fn declaration_type(&mut self, id: DeclId) -> String {
        if let Some(known) = &self.memo[id] {
            return known.clone();
        }
        if self.in_progress[id] {
            return UNKNOWN_TYPE.to_string();
        }
        self.in_progress[id] = true;
        let source = self.bindings.declarations[id].source.clone();
        let type_text = self.source_type(&source);
        self.in_progress[id] = false;
        self.memo[id] = Some(type_text.clone());
        type_text
    }

    fn source_type(&mut self, source: &TypeSource) -> String {
        match source {
            TypeSource::Fixed(text) => text.clone(),
            TypeSource::Expression(node_ref) => match node_ref.resolve(self.root) {
                Some(node) => {
                    let (text, bindings) = (self.source, self.bindings);
                    let mut lookup = |id: DeclId| self.declaration_type(id);
                    expression_type(node, text, bindings, &mut lookup, 0)
                }
                None => UNKNOWN_TYPE.to_string(),
            },
            TypeSource::Callable(node_ref) => match node_ref.resolve(self.root) {
                Some(node) => {
                    let (text, bindings) = (self.source, self.bindings);
                    let mut lookup = |id: DeclId| self.declaration_type(id);
                    callable_type(node, text, bindings, &mut lookup, 0)
                }
                None => UNKNOWN_TYPE.to_string(),
            },
        }
    }
}

type Lookup<'l> = dyn FnMut(DeclId) -> String + 'l;

const MAX_DEPTH: usize = 32;

fn any() -> String {
    UNKNOWN_TYPE.to_string()
}

/// The TypeScript-style type of an expression node.
pub(crate) fn expression_type(
    node: Node<'_>,
    source: &str,
    bindings: &Bindings,
    lookup: &mut Lookup<'_>,
    depth: usize,
) -> String {
    if depth > MAX_DEPTH {
        return any();
    }
    match node.kind() {
        "string" | "template_string" => "string".to_string(),
        "number" => "number".to_string(),
        "true" | "false" => "boolean".to_string(),
        "null" => "null".to_string(),
        "undefined" => "undefined".to_string(),
        "regex" => "RegExp".to_string(),
        "object" => OBJECT_TYPE.to_string(),
        "array" => {
            let elements: Vec<String> = named_children(node)
                .into_iter()
                .filter(|child| child.kind() != "comment")
                .map(|child| match child.kind() {
                    "spread_element" => any(),
                    _ => expression_type(child, source, bindings, lookup, depth + 1),
                })
                .collect();
            array_of(&elements)
        }
        "identifier" => {
            let name = node_text(node, source);
            match bindings.resolve(name, node.start_byte(), Space::Value) {
                Some(id) => lookup(id),
                None if name == "undefined" => "undefined".to_string(),
                None => any(),
            }
        }
        "new_expression" => node
            .child_by_field_name("constructor")
            .map(|constructor| normalized_text(constructor, source))
            .unwrap_or_else(any),
        "call_expression" => call_type(node, source, bindings, lookup, depth),
        kind if FUNCTION_LIKE.contains(&kind) => callable_type(node, source, bindings, lookup, depth + 1),
        "parenthesized_expression" | "non_null_expression" | "sequence_expression" => named_children(node)
            .last()
            .map(|inner| expression_type(*inner, source, bindings, lookup, depth + 1))
            .unwrap_or_else(any),
        "as_expression" | "satisfies_expression" => {
            let children = named_children(node);
            match children.as_slice() {
                [_, target] => normalized_text(*target, source),
                [expression] => expression_type(*expression, source, bindings, lookup, depth + 1),
                _ => any(),
            }
        }
        "await_expression" => {
            let inner = named_children(node)
                .first()
                .map(|n| expression_type(*n, source, bindings, lookup, depth + 1))
                .unwrap_or_else(any);
            inner
                .strip_prefix("Promise<")
                .and_then(|rest| rest.strip_suffix('>'))
                .map(str::to_string)
                .unwrap_or(inner)
        }
        "assignment_expression" => node
            .child_by_field_name("right")
            .map(|right| expression_type(right, source, bindings, lookup, depth + 1))
            .unwrap_or_else(any),
        "unary_expression" => match node.child_by_field_name("operator").map(|o| o.kind()) {
            Some("!") | Some("delete") => "boolean".to_string(),
            Some("typeof") => "string".to_string(),
            Some("void") => "undefined".to_string(),
            Some("-") | Some("+") | Some("~") => "number".to_string(),
            _ => any(),
        },
        "update_expression" => "number".to_string(),
        "ternary_expression" => {
            let consequence = node
                .child_by_field_name("consequence")
                .map(|n| expression_type(n, source, bindings, lookup, depth + 1));
            let alternative = node
                .child_by_field_name("alternative")
                .map(|n| expression_type(n, source, bindings, lookup, depth + 1));
            match (consequence, alternative) {
                (Some(a), Some(b)) => union(&[a, b]),
                _ => any(),
            }
        }
        "binary_expression" => binary_type(node, source, bindings, lookup, depth),
        _ => any(),
    }
}

fn binary_type(
    node: Node<'_>,
    source: &str,
    bindings: &Bindings,
    lookup: &mut Lookup<'_>,
    depth: usize,
) -> String {
    let operator = node.child_by_field_name("operator").map(|o| o.kind()).unwrap_or("");
    match operator {
        "==" | "===" | "!=" | "!==" | "<" | ">" | "<=" | ">=" | "instanceof" | "in" => {
            "boolean".to_string()
        }
        "-" | "*" | "/" | "%" | "**" | "&" | "|" | "^" | "<<" | ">>" | ">>>" => "number".to_string(),
        "+" | "&&" | "||" | "??" => {
            let left = node
                .child_by_field_name("left")
                .map(|n| expression_type(n, source, bindings, lookup, depth + 1))
                .unwrap_or_else(any);
            let right = node
                .child_by_field_name("right")
                .map(|n| expression_type(n, source, bindings, lookup, depth + 1))
                .unwrap_or_else(any);
            if operator != "+" {
                return union(&[left, right]);
            }
            if left == "string" || right == "string" {
                "string".to_string()
            } else if left == "number" && right == "number" {
                "number".to_string()
            } else {
                any()
            }
        }
        _ => any(),
    }
}

fn call_type(
    node: Node<'_>,
    source: &str,
    bindings: &Bindings,
    lookup: &mut Lookup<'_>,
    depth: usize,
) -> String {
    let Some(function) = node.child_by_field_name("function") else {
        return any();
    };
    match function.kind() {
        "identifier" => {
            let name = node_text(function, source);
            if let Some(id) = bindings.resolve(name, function.start_byte(), Space::Value) {
                let callee = lookup(id);
                return return_type_of(&callee).map(str::to_string).unwrap_or_else(any);
            }
            catalog::function_signature(name)
                .map(|sig| sig.return_type.to_string())
                .unwrap_or_else(any)
        }
        "member_expression" => {
            let qualified = normalized_text(function, source);
            if let Some(sig) = catalog::function_signature(&qualified) {
                return sig.return_type.to_string();
            }
            member_call_type(function, source, bindings, lookup, depth).unwrap_or_else(any)
        }
        _ => any(),
    }
}

/// Return type of `receiver.method(...)` where the receiver's type is a class
/// or interface declared in the document.
fn member_call_type(
    member: Node<'_>,
    source: &str,
    bindings: &Bindings,
    lookup: &mut Lookup<'_>,
    depth: usize,
) -> Option<String> {
    let object = member.child_by_field_name("object")?;
    let property = node_text(member.child_by_field_name("property")?, source);
    let receiver = expression_type(object, source, bindings, lookup, depth + 1);
    let type_name = receiver.strip_prefix("typeof ").unwrap_or(&receiver);
    let id = bindings.resolve(type_name, member.start_byte(), Space::Type)?;
    let declared = bindings.get(id).members.iter().find(|m| m.name == property)?;
    if declared.kind != MemberKind::Method || declared.type_text.is_empty() {
        return None;
    }
    return_type_of(&declared.type_text).map(str::to_string)
}

/// The signature of a function-like node: `<T>(a: T, b?: number) => R`.
pub(crate) fn callable_type(
    node: Node<'_>,
    source: &str,
    bindings: &Bindings,
    lookup: &mut Lookup<'_>,
    depth: usize,
) -> String {
    let type_parameters = node
        .child_by_field_name("type_parameters")
        .map(|tp| normalized_text(tp, source))
        .unwrap_or_default();

    let parameters = if let Some(parameters) = node.child_by_field_name("parameters") {
        named_children(parameters)
            .into_iter()
            .filter(|p| matches!(p.kind(), "required_parameter" | "optional_parameter"))
            .map(|p| parameter_text(p, source, bindings, lookup, depth))
            .collect::<Vec<_>>()
            .join(", ")
    } else if let Some(parameter) = node.child_by_field_name("parameter") {
        format!("{}: any", node_text(parameter, source))
    } else {
        String::new()
    };

    let return_type = match node.child_by_field_name("return_type") {
        Some(annotation) => annotation_text(annotation, source),
        None => {
            let inferred = inferred_return_type(node, source, bindings, lookup, depth);
            let is_async = children(node).iter().any(|child| child.kind() == "async");
            if is_async { format!("Promise<{}>", inferred) } else { inferred }
        }
    };

    format!("{}({}) => {}", type_parameters, parameters, return_type)
}

fn parameter_text(
    parameter: Node<'_>,
    source: &str,
    bindings: &Bindings,
    lookup: &mut Lookup<'_>,
    depth: usize,
) -> String {
    let pattern = parameter
        .child_by_field_name("pattern")
        .map(|p| normalized_text(p, source))
        .unwrap_or_default();
    let optional = if parameter.kind() == "optional_parameter" { "?" } else { "" };
    let type_text = parameter
        .child_by_field_name("type")
        .map(|t| annotation_text(t, source))
        .or_else(|| {
            parameter
                .child_by_field_name("value")
                .map(|v| expression_type(v, source, bindings, lookup, depth + 1))
        })
        .unwrap_or_else(any);
    format!("{}{}: {}", pattern, optional, type_text)
}

fn inferred_return_type(
    node: Node<'_>,
    source: &str,
    bindings: &Bindings,
    lookup: &mut Lookup<'_>,
    depth: usize,
) -> String {
    let Some(body) = node.child_by_field_name("body") else {
        return any();
    };
    if body.kind() != "statement_block" {
        return expression_type(body, source, bindings, lookup, depth + 1);
    }

    // First `return <expr>` that belongs to this function, not a nested one.
    let mut stack = vec![body];
    while let Some(current) = stack.pop() {
        if current.kind() == "return_statement" {
            if let Some(value) = named_children(current).first().copied() {
                return expression_type(value, source, bindings, lookup, depth + 1);
            }
            continue;
        }
        if current != body && (FUNCTION_LIKE.contains(&current.kind()) || current.kind() == "class_body") {
            continue;
        }
        stack.extend(named_children(current).into_iter().rev());
    }
    "void".to_string()
}

/// Return type part of a rendered function type.
pub fn return_type_of(function_type: &str) -> Option<&str> {
    let mut rest = function_type.trim();
    if rest.starts_with('<') {
        let end = matching_close(rest, '<', '>')?;
        rest = rest[end + 1..].trim_start();
    }
    if !rest.starts_with('(') {
        return None;
    }
    let end = matching_close(rest, '(', ')')?;
    rest[end + 1..].trim_start().strip_prefix("=>").map(str::trim)
}

fn matching_close(text: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

fn union(types: &[String]) -> String {
    let mut unique: Vec<&str> = Vec::new();
    for t in types {
        if !unique.contains(&t.as_str()) {
            unique.push(t);
        }
    }
    if unique.contains(&UNKNOWN_TYPE) {
        return any();
    }
    unique.join(" | ")
}

fn array_of(elements: &[String]) -> String {
    if elements.is_empty() {
        return format!("{}[]", UNKNOWN_TYPE);
    }
    let element = union(elements);
    if element.contains(' ') {
        format!("({})[]", element)
    } else {
        format!("{}[]", element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_return_type_of() {
        assert_eq!(return_type_of("(a: number, b: number) => number"), Some("number"));
        assert_eq!(return_type_of("<T>(value: T) => T"), Some("T"));
        assert_eq!(return_type_of("(f: (x: number) => void) => string"), Some("string"));
        assert_eq!(return_type_of("() => (x: number) => number"), Some("(x: number) => number"));
        assert_eq!(return_type_of("string"), None);
        assert_eq!(return_type_of("typeof Point"), None);
    }

    #[test]
    fn test_array_and_union_rendering() {
        assert_eq!(array_of(&[]), "any[]");
        assert_eq!(array_of(&["number".into(), "number".into()]), "number[]");
        assert_eq!(array_of(&["number".into(), "string".into()]), "(number | string)[]");
        assert_eq!(union(&["string".into(), "any".into()]), "any");
    }
}
