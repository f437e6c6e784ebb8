//! Compiler diagnostics
//!
//! The checker reports, in this order:
//!
//! 1. Syntax errors from the parse tree (`ERROR` and missing nodes)
//! 2. Conflicting declarations in the same scope
//! 3. Primitive literal values assigned to a different primitive type
//! 4. Names that resolve to no declaration and no known global
//! 5. Unreachable statements and unused locals, as suggestions
//!
//! Each finding carries a compiler [`Category`]; editors see it through
//! [`severity`].

use std::ops::Range;

use rustc_hash::FxHashMap;
use tower_lsp::lsp_types::DiagnosticSeverity;
use tree_sitter::Node;

use super::binder::{
    Bindings, DeclId, DeclarationKind, FUNCTION_LIKE, ScopeKind, Space, annotation_text,
    in_parameter_pattern,
};
use crate::catalog;
use crate::parsers::typescript::{ancestor_of_kind, children, named_children, node_text};

/// Diagnostic categories as a compiler reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Error,
    Warning,
    Suggestion,
    Message,
}

/// Editor severity for a compiler category.
pub fn severity(category: Category) -> DiagnosticSeverity {
    match category {
        Category::Error => DiagnosticSeverity::ERROR,
        Category::Warning => DiagnosticSeverity::WARNING,
        Category::Suggestion | Category::Message => DiagnosticSeverity::INFORMATION,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerDiagnostic {
    pub byte_range: Range<usize>,
    pub category: Category,
    pub message: String,
}

const PRIMITIVES: &[&str] = &["string", "number", "boolean"];

const TERMINATORS: &[&str] = &[
    "return_statement",
    "throw_statement",
    "break_statement",
    "continue_statement",
];

/// Ancestors under which identifiers are not name references.
const NON_REFERENCE_CONTEXTS: &[&str] = &[
    "ERROR",
    "decorator",
    "import_statement",
    "index_signature",
    "enum_body",
];

pub fn check(root: Node<'_>, source: &str, bindings: &Bindings) -> Vec<CompilerDiagnostic> {
    let declaration_names: FxHashMap<(usize, usize), DeclId> = bindings
        .declarations
        .iter()
        .enumerate()
        .map(|(id, d)| ((d.name_range.start, d.name_range.end), id))
        .collect();

    let mut checker = Checker {
        source,
        bindings,
        declaration_names,
        references: vec![0; bindings.declarations.len()],
        diagnostics: Vec::new(),
    };

    checker.syntax_errors(root);
    checker.duplicate_declarations();
    checker.walk(root);
    if !root.has_error() {
        checker.unused_locals();
    }

    let mut diagnostics = checker.diagnostics;
    diagnostics.sort_by_key(|d| (d.byte_range.start, d.byte_range.end));
    diagnostics
}

struct Checker<'a> {
    source: &'a str,
    bindings: &'a Bindings,
    declaration_names: FxHashMap<(usize, usize), DeclId>,
    references: Vec<usize>,
    diagnostics: Vec<CompilerDiagnostic>,
}

impl Checker<'_> {
    fn report(&mut self, byte_range: Range<usize>, category: Category, message: String) {
        self.diagnostics.push(CompilerDiagnostic { byte_range, category, message });
    }

    fn syntax_errors(&mut self, root: Node<'_>) {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.is_error() {
                let message = match error_snippet(node_text(node, self.source)) {
                    Some(snippet) => format!("Unexpected token '{}'.", snippet),
                    None => "Unexpected token.".to_string(),
                };
                self.report(node.byte_range(), Category::Error, message);
                continue;
            }
            if node.is_missing() {
                let message = match node.kind() {
                    "identifier" | "type_identifier" | "property_identifier" => "Identifier expected.".to_string(),
                    kind => format!("'{}' expected.", kind),
                };
                self.report(node.byte_range(), Category::Error, message);
                continue;
            }
            if node.has_error() {
                stack.extend(children(node).into_iter().rev());
            }
        }
    }

    fn duplicate_declarations(&mut self) {
        let bindings = self.bindings;
        for scope in &bindings.scopes {
            let mut groups: Vec<(&str, Vec<DeclId>)> = Vec::new();
            for &id in &scope.declarations {
                let name = bindings.get(id).name.as_str();
                match groups.iter_mut().find(|(n, _)| *n == name) {
                    Some((_, ids)) => ids.push(id),
                    None => groups.push((name, vec![id])),
                }
            }

            for (name, ids) in groups.into_iter().filter(|(_, ids)| ids.len() > 1) {
                self.value_conflicts(name, &ids);
                self.type_conflicts(name, &ids);
            }
        }
    }

    fn value_conflicts(&mut self, name: &str, ids: &[DeclId]) {
        let bindings = self.bindings;
        let values: Vec<DeclId> = ids
            .iter()
            .copied()
            .filter(|&id| {
                let kind = bindings.get(id).kind;
                kind.in_value_space()
                    && !matches!(
                        kind,
                        DeclarationKind::Namespace | DeclarationKind::Module | DeclarationKind::FunctionSignature
                    )
            })
            .collect();
        if values.len() < 2 {
            return;
        }

        let kinds: Vec<DeclarationKind> = values.iter().map(|&id| bindings.get(id).kind).collect();
        let (targets, message): (Vec<DeclId>, String) = if kinds.iter().any(|k| k.is_block_scoped()) {
            (values, format!("Cannot redeclare block-scoped variable '{}'.", name))
        } else if kinds.iter().all(|k| *k == DeclarationKind::Function) {
            let implementations: Vec<DeclId> =
                values.into_iter().filter(|&id| bindings.get(id).has_body).collect();
            if implementations.len() < 2 {
                return;
            }
            (implementations, "Duplicate function implementation.".to_string())
        } else if kinds.iter().all(|k| matches!(k, DeclarationKind::Var | DeclarationKind::Parameter)) {
            return;
        } else {
            (values, format!("Duplicate identifier '{}'.", name))
        };

        for id in targets {
            let range = bindings.get(id).name_range.clone();
            self.report(range, Category::Error, message.clone());
        }
    }

    fn type_conflicts(&mut self, name: &str, ids: &[DeclId]) {
        let bindings = self.bindings;
        let types: Vec<DeclId> = ids
            .iter()
            .copied()
            .filter(|&id| {
                matches!(
                    bindings.get(id).kind,
                    DeclarationKind::TypeAlias | DeclarationKind::Interface | DeclarationKind::Class
                )
            })
            .collect();
        let has_alias = types.iter().any(|&id| bindings.get(id).kind == DeclarationKind::TypeAlias);
        if !has_alias || types.len() < 2 {
            return;
        }
        for id in types {
            let range = bindings.get(id).name_range.clone();
            self.report(range, Category::Error, format!("Duplicate identifier '{}'.", name));
        }
    }

    fn walk(&mut self, root: Node<'_>) {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            match node.kind() {
                "ERROR" => continue,
                "identifier" | "shorthand_property_identifier" => self.check_name(node),
                "variable_declarator" => self.check_initializer(node),
                "return_statement" => self.check_return(node),
                "statement_block" | "program" | "switch_case" | "switch_default" => {
                    self.check_reachability(node)
                }
                _ => {}
            }
            stack.extend(named_children(node).into_iter().rev());
        }
    }

    fn check_name(&mut self, node: Node<'_>) {
        if self.declaration_names.contains_key(&(node.start_byte(), node.end_byte()))
            || in_parameter_pattern(node)
            || ancestor_of_kind(node, NON_REFERENCE_CONTEXTS).is_some()
            || !is_reference_position(node)
        {
            return;
        }

        let name = node_text(node, self.source);
        match self.bindings.resolve(name, node.start_byte(), Space::Value) {
            Some(id) => self.references[id] += 1,
            None if catalog::is_global_name(name) => {}
            None => self.report(
                node.byte_range(),
                Category::Error,
                format!("Cannot find name '{}'.", name),
            ),
        }
    }

    fn check_initializer(&mut self, declarator: Node<'_>) {
        let (Some(name), Some(annotation), Some(value)) = (
            declarator.child_by_field_name("name"),
            declarator.child_by_field_name("type"),
            declarator.child_by_field_name("value"),
        ) else {
            return;
        };
        let expected = annotation_text(annotation, self.source);
        if let Some(message) = assignability_error(&expected, value, self.source) {
            self.report(name.byte_range(), Category::Error, message);
        }
    }

    fn check_return(&mut self, statement: Node<'_>) {
        let Some(value) = named_children(statement).first().copied() else {
            return;
        };
        let Some(function) = ancestor_of_kind(statement, FUNCTION_LIKE) else {
            return;
        };
        let Some(annotation) = function.child_by_field_name("return_type") else {
            return;
        };
        let expected = annotation_text(annotation, self.source);
        if let Some(message) = assignability_error(&expected, value, self.source) {
            self.report(value.byte_range(), Category::Error, message);
        }
    }

    fn check_reachability(&mut self, block: Node<'_>) {
        let statements: Vec<Node<'_>> = named_children(block)
            .into_iter()
            .filter(|n| !matches!(n.kind(), "comment" | "empty_statement"))
            .collect();
        let Some(terminator) = statements.iter().position(|s| TERMINATORS.contains(&s.kind())) else {
            return;
        };

        // `switch_case` children include the case value before its statements.
        let unreachable: Vec<&Node<'_>> = statements[terminator + 1..]
            .iter()
            .filter(|s| s.kind() != "function_declaration")
            .collect();
        if let (Some(first), Some(last)) = (unreachable.first(), unreachable.last()) {
            self.report(
                first.start_byte()..last.end_byte(),
                Category::Suggestion,
                "Unreachable code detected.".to_string(),
            );
        }
    }

    fn unused_locals(&mut self) {
        let bindings = self.bindings;
        for (id, declaration) in bindings.declarations.iter().enumerate() {
            let local = bindings.scopes[declaration.scope].kind != ScopeKind::Program;
            let variable = matches!(
                declaration.kind,
                DeclarationKind::Let | DeclarationKind::Const | DeclarationKind::Var
            );
            if local && variable && self.references[id] == 0 && !declaration.name.starts_with('_') {
                self.report(
                    declaration.name_range.clone(),
                    Category::Suggestion,
                    format!("'{}' is declared but its value is never read.", declaration.name),
                );
            }
        }
    }
}

/// Identifiers in these positions name something other than a variable.
fn is_reference_position(node: Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return true;
    };
    match parent.kind() {
        "export_specifier" => parent.child_by_field_name("alias") != Some(node),
        "nested_identifier" => !parent
            .parent()
            .is_some_and(|p| matches!(p.kind(), "internal_module" | "module")),
        _ => !ancestor_of_kind(node, &["export_statement"])
            .is_some_and(|export| export.child_by_field_name("source").is_some()),
    }
}

/// Widened primitive type of a literal expression.
pub(crate) fn literal_type(node: Node<'_>, source: &str) -> Option<&'static str> {
    match node.kind() {
        "string" | "template_string" => Some("string"),
        "number" => Some("number"),
        "true" | "false" => Some("boolean"),
        "null" => Some("null"),
        "undefined" => Some("undefined"),
        "identifier" if node_text(node, source) == "undefined" => Some("undefined"),
        _ => None,
    }
}

fn assignability_error(expected: &str, value: Node<'_>, source: &str) -> Option<String> {
    if !PRIMITIVES.contains(&expected) {
        return None;
    }
    let actual = literal_type(value, source)?;
    (actual != expected).then(|| format!("Type '{}' is not assignable to type '{}'.", actual, expected))
}

fn error_snippet(text: &str) -> Option<String> {
    let first = text.split_whitespace().next()?;
    Some(first.chars().take(20).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::typescript::parse_code;
    use crate::semantic::binder::bind;
    use indoc::indoc;

    fn diagnostics(source: &str) -> Vec<CompilerDiagnostic> {
        let tree = parse_code(source).expect("grammar loads");
        let bindings = bind(tree.root_node(), source);
        check(tree.root_node(), source, &bindings)
    }

    fn messages(source: &str) -> Vec<String> {
        diagnostics(source).into_iter().map(|d| d.message).collect()
    }

    #[test]
    fn test_clean_source_has_no_diagnostics() {
        let source = indoc! {r#"
            import { helper } from "./helper";
            const limit: number = 10;
            function add(a: number, b: number): number {
                return a + b;
            }
            class Point {
                constructor(public x: number, public y: number) {}
            }
            const p = new Point(1, 2);
            console.log(add(limit, p.x), helper, Math.max(1, 2));
        "#};
        assert_eq!(messages(source), Vec::<String>::new());
    }

    #[test]
    fn test_syntax_error_reported() {
        let found = diagnostics("let x = ;\nfunction (");
        assert!(!found.is_empty());
        assert!(found.iter().all(|d| d.category == Category::Error));
    }

    #[test]
    fn test_block_scoped_redeclaration() {
        let found = messages("let count = 1;\nlet count = 2;\nconsole.log(count);");
        assert_eq!(
            found,
            vec![
                "Cannot redeclare block-scoped variable 'count'.".to_string(),
                "Cannot redeclare block-scoped variable 'count'.".to_string(),
            ]
        );
    }

    #[test]
    fn test_var_redeclaration_allowed_and_shadowing_allowed() {
        let source = indoc! {r#"
            var total = 1;
            var total = 2;
            let value = 1;
            function f() {
                let value = 2;
                return value + total;
            }
            f();
        "#};
        assert_eq!(messages(source), Vec::<String>::new());
    }

    #[test]
    fn test_duplicate_function_implementation() {
        let found = messages("function f() {}\nfunction f() {}\nf();");
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|m| m == "Duplicate function implementation."));
    }

    #[test]
    fn test_literal_assignability() {
        let found = messages("let n: number = \"text\";\nlet s: string = 'ok';\nlet b: boolean = 1;");
        assert_eq!(
            found,
            vec![
                "Type 'string' is not assignable to type 'number'.".to_string(),
                "Type 'number' is not assignable to type 'boolean'.".to_string(),
            ]
        );
    }

    #[test]
    fn test_return_assignability() {
        let found = messages("function name(): string {\n    return 42;\n}\nname();");
        assert_eq!(found, vec!["Type 'number' is not assignable to type 'string'.".to_string()]);
    }

    #[test]
    fn test_unresolved_names() {
        let found = messages("let a = 1;\nconsole.log(a + missing);");
        assert_eq!(found, vec!["Cannot find name 'missing'.".to_string()]);
    }

    #[test]
    fn test_function_type_parameters_are_not_references() {
        let source = "let handler: (event: string) => void = (e) => console.log(e);\nhandler(\"x\");";
        assert_eq!(messages(source), Vec::<String>::new());
    }

    #[test]
    fn test_unreachable_and_unused_are_suggestions() {
        let source = indoc! {r#"
            function f(): number {
                let unused = 1;
                return 2;
                console.log("never");
            }
            f();
        "#};
        let found = diagnostics(source);
        let suggestions: Vec<_> = found
            .iter()
            .filter(|d| d.category == Category::Suggestion)
            .map(|d| d.message.as_str())
            .collect();
        assert_eq!(
            suggestions,
            vec!["'unused' is declared but its value is never read.", "Unreachable code detected."]
        );
        assert_eq!(severity(Category::Suggestion), DiagnosticSeverity::INFORMATION);
        assert_eq!(severity(Category::Warning), DiagnosticSeverity::WARNING);
    }
}
