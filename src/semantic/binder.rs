//! Scope construction and declaration binding
//!
//! The binder walks the syntax tree once and records:
//!
//! - **Scopes**: program, function-like (parameters and body share one
//!   scope), block, `for`/`catch` headers, class and type-parameter scopes.
//! - **Declarations**: every name introduced by a declaration, parameter,
//!   import or type parameter, tagged with the scope that owns it and a
//!   [`TypeSource`] describing how to compute its type.
//!
//! `var` declarations hoist to the nearest function or program scope; all
//! other declarations belong to the innermost enclosing scope. Types are not
//! computed here; see [`super::types`].

use std::ops::Range;

use rustc_hash::FxHashMap;
use tree_sitter::Node;

use crate::lexical::SymbolKind;
use crate::parsers::typescript::{named_children, node_text, normalized_text};

pub type ScopeId = usize;
pub type DeclId = usize;

pub(crate) const FUNCTION_LIKE: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "function_expression",
    "function",
    "generator_function",
    "arrow_function",
    "method_definition",
];

const PATTERN_KINDS: &[&str] = &[
    "object_pattern",
    "array_pattern",
    "pair_pattern",
    "assignment_pattern",
    "object_assignment_pattern",
    "rest_pattern",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Program,
    Function,
    Block,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub byte_range: Range<usize>,
    /// Declarations in source order.
    pub declarations: Vec<DeclId>,
    by_name: FxHashMap<String, Vec<DeclId>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Let,
    Const,
    Var,
    Parameter,
    CatchParameter,
    Function,
    /// Overload signature without a body.
    FunctionSignature,
    Class,
    Interface,
    TypeAlias,
    Enum,
    Namespace,
    Module,
    Import,
    TypeParameter,
}

impl DeclarationKind {
    pub fn in_value_space(self) -> bool {
        !matches!(
            self,
            DeclarationKind::Interface | DeclarationKind::TypeAlias | DeclarationKind::TypeParameter
        )
    }

    pub fn in_type_space(self) -> bool {
        matches!(
            self,
            DeclarationKind::Class
                | DeclarationKind::Interface
                | DeclarationKind::TypeAlias
                | DeclarationKind::Enum
                | DeclarationKind::TypeParameter
                | DeclarationKind::Import
                | DeclarationKind::Namespace
        )
    }

    pub fn is_block_scoped(self) -> bool {
        matches!(self, DeclarationKind::Let | DeclarationKind::Const)
    }

    pub fn label(self) -> &'static str {
        match self {
            DeclarationKind::Let | DeclarationKind::Var => "variable",
            DeclarationKind::Const => "constant",
            DeclarationKind::Parameter | DeclarationKind::CatchParameter => "parameter",
            DeclarationKind::Function | DeclarationKind::FunctionSignature => "function",
            DeclarationKind::Class => "class",
            DeclarationKind::Interface => "interface",
            DeclarationKind::TypeAlias => "type alias",
            DeclarationKind::Enum => "enum",
            DeclarationKind::Namespace => "namespace",
            DeclarationKind::Module => "module",
            DeclarationKind::Import => "import",
            DeclarationKind::TypeParameter => "type parameter",
        }
    }
}

/// Where a node lives in the tree, so it can be found again after binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRef {
    pub start: usize,
    pub end: usize,
    pub kind: &'static str,
}

impl NodeRef {
    pub fn of(node: Node<'_>) -> Self {
        Self { start: node.start_byte(), end: node.end_byte(), kind: node.kind() }
    }

    /// Finds the node again in `root`.
    pub fn resolve<'t>(&self, root: Node<'t>) -> Option<Node<'t>> {
        let mut node = root.descendant_for_byte_range(self.start, self.end)?;
        loop {
            if node.kind() == self.kind && node.start_byte() == self.start && node.end_byte() == self.end {
                return Some(node);
            }
            let parent = node.parent()?;
            if parent.start_byte() != self.start || parent.end_byte() != self.end {
                return None;
            }
            node = parent;
        }
    }
}

/// How to compute a declaration's type once binding is complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSource {
    /// Already known, e.g. an annotation or `typeof Point`.
    Fixed(String),
    /// The type of an initializer expression.
    Expression(NodeRef),
    /// The signature of a function-like node.
    Callable(NodeRef),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Property,
    Method,
}

/// A property or method of a class or interface.
#[derive(Debug, Clone)]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    pub type_text: String,
    pub(crate) source: TypeSource,
}

#[derive(Debug, Clone)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    pub scope: ScopeId,
    pub name_range: Range<usize>,
    /// Function body present (false for overload signatures).
    pub has_body: bool,
    /// Declares type parameters.
    pub generic: bool,
    pub type_text: String,
    pub members: Vec<Member>,
    pub(crate) source: TypeSource,
}

impl Declaration {
    /// Kind reported to editors, or `None` for declarations that are not
    /// listed as document symbols.
    pub fn symbol_kind(&self) -> Option<SymbolKind> {
        Some(match self.kind {
            DeclarationKind::Function | DeclarationKind::FunctionSignature if self.generic => {
                SymbolKind::GenericFunction
            }
            DeclarationKind::Function | DeclarationKind::FunctionSignature => SymbolKind::Function,
            DeclarationKind::Class => SymbolKind::Class,
            DeclarationKind::Interface => SymbolKind::Interface,
            DeclarationKind::TypeAlias => SymbolKind::TypeAlias,
            DeclarationKind::Enum => SymbolKind::Enum,
            DeclarationKind::Namespace => SymbolKind::Namespace,
            DeclarationKind::Module => SymbolKind::Module,
            DeclarationKind::Const => SymbolKind::Constant,
            DeclarationKind::Let
            | DeclarationKind::Var
            | DeclarationKind::Parameter
            | DeclarationKind::CatchParameter
            | DeclarationKind::Import => SymbolKind::Variable,
            DeclarationKind::TypeParameter => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Space {
    Value,
    Type,
}

/// Output of the binder.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    pub scopes: Vec<Scope>,
    pub declarations: Vec<Declaration>,
}

impl Bindings {
    /// The innermost scope containing `offset`.
    pub fn scope_at(&self, offset: usize) -> ScopeId {
        let mut best = 0;
        for (id, scope) in self.scopes.iter().enumerate() {
            let range = &scope.byte_range;
            if range.start <= offset && offset <= range.end {
                let best_range = &self.scopes[best].byte_range;
                if range.len() <= best_range.len() {
                    best = id;
                }
            }
        }
        best
    }

    /// Scope chain from the innermost scope at `offset` out to the program.
    pub fn scope_chain(&self, offset: usize) -> Vec<ScopeId> {
        let mut chain = Vec::new();
        let mut current = (!self.scopes.is_empty()).then(|| self.scope_at(offset));
        while let Some(id) = current {
            chain.push(id);
            current = self.scopes[id].parent;
        }
        chain
    }

    /// Resolves `name` as seen from `offset`.
    pub fn resolve(&self, name: &str, offset: usize, space: Space) -> Option<DeclId> {
        self.scope_chain(offset).into_iter().find_map(|scope| {
            self.scopes[scope].by_name.get(name)?.iter().copied().find(|&id| {
                let kind = self.declarations[id].kind;
                match space {
                    Space::Value => kind.in_value_space(),
                    Space::Type => kind.in_type_space(),
                }
            })
        })
    }

    /// Declaration whose name occupies exactly `range`.
    pub fn declaration_named_at(&self, range: Range<usize>) -> Option<DeclId> {
        self.declarations.iter().position(|d| d.name_range == range)
    }

    pub fn get(&self, id: DeclId) -> &Declaration {
        &self.declarations[id]
    }
}

/// Builds [`Bindings`] for the tree rooted at `root`.
pub fn bind(root: Node<'_>, source: &str) -> Bindings {
    let mut binder = Binder { source, bindings: Bindings::default() };
    let program = binder.new_scope(ScopeKind::Program, None, root);
    binder.visit_children(root, program);
    binder.bindings
}

struct Binder<'s> {
    source: &'s str,
    bindings: Bindings,
}

impl Binder<'_> {
    fn new_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>, node: Node<'_>) -> ScopeId {
        self.bindings.scopes.push(Scope {
            kind,
            parent,
            byte_range: node.byte_range(),
            declarations: Vec::new(),
            by_name: FxHashMap::default(),
        });
        self.bindings.scopes.len() - 1
    }

    fn function_scope_of(&self, mut scope: ScopeId) -> ScopeId {
        while self.bindings.scopes[scope].kind == ScopeKind::Block {
            match self.bindings.scopes[scope].parent {
                Some(parent) => scope = parent,
                None => break,
            }
        }
        scope
    }

    fn declare(
        &mut self,
        scope: ScopeId,
        name_node: Node<'_>,
        kind: DeclarationKind,
        source: TypeSource,
    ) -> DeclId {
        let name = node_text(name_node, self.source).to_string();
        let id = self.bindings.declarations.len();
        self.bindings.declarations.push(Declaration {
            name: name.clone(),
            kind,
            scope,
            name_range: name_node.byte_range(),
            has_body: true,
            generic: false,
            type_text: String::new(),
            members: Vec::new(),
            source,
        });
        let scope_entry = &mut self.bindings.scopes[scope];
        scope_entry.declarations.push(id);
        scope_entry.by_name.entry(name).or_default().push(id);
        id
    }

    fn visit_children(&mut self, node: Node<'_>, scope: ScopeId) {
        for child in named_children(node) {
            self.visit(child, scope);
        }
    }

    fn visit(&mut self, node: Node<'_>, scope: ScopeId) {
        match node.kind() {
            "lexical_declaration" | "variable_declaration" => {
                self.bind_variables(node, scope);
                self.visit_children(node, scope);
            }
            "function_declaration" | "generator_function_declaration" | "function_signature" => {
                if let Some(name) = node.child_by_field_name("name") {
                    let kind = if node.kind() == "function_signature" {
                        DeclarationKind::FunctionSignature
                    } else {
                        DeclarationKind::Function
                    };
                    let id = self.declare(scope, name, kind, TypeSource::Callable(NodeRef::of(node)));
                    let decl = &mut self.bindings.declarations[id];
                    decl.has_body = node.child_by_field_name("body").is_some();
                    decl.generic = node.child_by_field_name("type_parameters").is_some();
                }
                self.visit_function(node, scope);
            }
            kind if FUNCTION_LIKE.contains(&kind) => self.visit_function(node, scope),
            "class_declaration" | "abstract_class_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    let class_name = node_text(name, self.source).to_string();
                    let id = self.declare(
                        scope,
                        name,
                        DeclarationKind::Class,
                        TypeSource::Fixed(format!("typeof {}", class_name)),
                    );
                    self.bindings.declarations[id].members = self.class_members(node);
                }
                let class_scope = self.new_scope(ScopeKind::Block, Some(scope), node);
                self.bind_type_parameters(node, class_scope);
                self.visit_children(node, class_scope);
            }
            "class" => {
                let class_scope = self.new_scope(ScopeKind::Block, Some(scope), node);
                // A named class expression is visible inside its own body only.
                if let Some(name) = node.child_by_field_name("name") {
                    let class_name = node_text(name, self.source).to_string();
                    let id = self.declare(
                        class_scope,
                        name,
                        DeclarationKind::Class,
                        TypeSource::Fixed(format!("typeof {}", class_name)),
                    );
                    self.bindings.declarations[id].members = self.class_members(node);
                }
                self.bind_type_parameters(node, class_scope);
                self.visit_children(node, class_scope);
            }
            "interface_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    let interface_name = node_text(name, self.source).to_string();
                    let id = self.declare(
                        scope,
                        name,
                        DeclarationKind::Interface,
                        TypeSource::Fixed(interface_name),
                    );
                    self.bindings.declarations[id].members = self.class_members(node);
                }
                let type_scope = self.new_scope(ScopeKind::Block, Some(scope), node);
                self.bind_type_parameters(node, type_scope);
            }
            "type_alias_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    let aliased = node
                        .child_by_field_name("value")
                        .map(|value| normalized_text(value, self.source))
                        .unwrap_or_else(|| "any".to_string());
                    self.declare(scope, name, DeclarationKind::TypeAlias, TypeSource::Fixed(aliased));
                }
                let type_scope = self.new_scope(ScopeKind::Block, Some(scope), node);
                self.bind_type_parameters(node, type_scope);
            }
            "enum_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    let enum_name = node_text(name, self.source).to_string();
                    self.declare(
                        scope,
                        name,
                        DeclarationKind::Enum,
                        TypeSource::Fixed(format!("typeof {}", enum_name)),
                    );
                }
            }
            "internal_module" | "module" => {
                let name = node.child_by_field_name("name").and_then(|name| match name.kind() {
                    "identifier" => Some(name),
                    "nested_identifier" => first_identifier(name),
                    _ => None,
                });
                if let Some(name) = name {
                    let kind = if node.kind() == "module" {
                        DeclarationKind::Module
                    } else {
                        DeclarationKind::Namespace
                    };
                    let label = node_text(name, self.source).to_string();
                    self.declare(scope, name, kind, TypeSource::Fixed(format!("typeof {}", label)));
                }
                self.visit_children(node, scope);
            }
            "import_statement" => self.bind_imports(node, scope),
            "statement_block" => {
                let shares_parent_scope = node
                    .parent()
                    .is_some_and(|p| FUNCTION_LIKE.contains(&p.kind()) || p.kind() == "catch_clause");
                let block = if shares_parent_scope {
                    scope
                } else {
                    self.new_scope(ScopeKind::Block, Some(scope), node)
                };
                self.visit_children(node, block);
            }
            "for_statement" | "switch_body" => {
                let block = self.new_scope(ScopeKind::Block, Some(scope), node);
                self.visit_children(node, block);
            }
            "for_in_statement" => {
                let block = self.new_scope(ScopeKind::Block, Some(scope), node);
                self.bind_for_in(node, block);
                self.visit_children(node, block);
            }
            "catch_clause" => {
                let block = self.new_scope(ScopeKind::Block, Some(scope), node);
                if let Some(parameter) = node.child_by_field_name("parameter") {
                    let source = node
                        .child_by_field_name("type")
                        .map(|t| TypeSource::Fixed(annotation_text(t, self.source)))
                        .unwrap_or_else(|| TypeSource::Fixed("unknown".to_string()));
                    for name in pattern_names(parameter) {
                        self.declare(block, name, DeclarationKind::CatchParameter, source.clone());
                    }
                }
                self.visit_children(node, block);
            }
            _ => self.visit_children(node, scope),
        }
    }

    fn visit_function(&mut self, node: Node<'_>, scope: ScopeId) {
        let function_scope = self.new_scope(ScopeKind::Function, Some(scope), node);

        // A named function expression can refer to itself.
        if matches!(node.kind(), "function_expression" | "function" | "generator_function") {
            if let Some(name) = node.child_by_field_name("name") {
                self.declare(
                    function_scope,
                    name,
                    DeclarationKind::Function,
                    TypeSource::Callable(NodeRef::of(node)),
                );
            }
        }

        self.bind_type_parameters(node, function_scope);

        if let Some(parameter) = node.child_by_field_name("parameter") {
            self.declare(
                function_scope,
                parameter,
                DeclarationKind::Parameter,
                TypeSource::Fixed("any".to_string()),
            );
        }
        if let Some(parameters) = node.child_by_field_name("parameters") {
            self.bind_parameters(parameters, function_scope);
        }

        for child in named_children(node) {
            if Some(child) != node.child_by_field_name("name") {
                self.visit(child, function_scope);
            }
        }
    }

    fn bind_parameters(&mut self, parameters: Node<'_>, scope: ScopeId) {
        for parameter in named_children(parameters) {
            if !matches!(parameter.kind(), "required_parameter" | "optional_parameter") {
                continue;
            }
            let Some(pattern) = parameter.child_by_field_name("pattern") else {
                continue;
            };
            let source = parameter
                .child_by_field_name("type")
                .map(|t| TypeSource::Fixed(annotation_text(t, self.source)))
                .or_else(|| {
                    parameter
                        .child_by_field_name("value")
                        .map(|v| TypeSource::Expression(NodeRef::of(v)))
                })
                .unwrap_or_else(|| TypeSource::Fixed("any".to_string()));
            let simple = pattern.kind() == "identifier";
            for name in pattern_names(pattern) {
                let source = if simple { source.clone() } else { TypeSource::Fixed("any".to_string()) };
                self.declare(scope, name, DeclarationKind::Parameter, source);
            }
        }
    }

    fn bind_type_parameters(&mut self, node: Node<'_>, scope: ScopeId) {
        let Some(type_parameters) = node.child_by_field_name("type_parameters") else {
            return;
        };
        for parameter in named_children(type_parameters) {
            if let Some(name) = parameter.child_by_field_name("name") {
                let label = node_text(name, self.source).to_string();
                self.declare(scope, name, DeclarationKind::TypeParameter, TypeSource::Fixed(label));
            }
        }
    }

    fn bind_variables(&mut self, node: Node<'_>, scope: ScopeId) {
        let kind = if node.kind() == "variable_declaration" {
            DeclarationKind::Var
        } else {
            match node.child_by_field_name("kind").map(|k| k.kind()) {
                Some("const") => DeclarationKind::Const,
                _ => DeclarationKind::Let,
            }
        };
        let target = if kind == DeclarationKind::Var { self.function_scope_of(scope) } else { scope };

        for declarator in named_children(node) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let Some(name) = declarator.child_by_field_name("name") else {
                continue;
            };
            let source = declarator
                .child_by_field_name("type")
                .map(|t| TypeSource::Fixed(annotation_text(t, self.source)))
                .or_else(|| {
                    declarator
                        .child_by_field_name("value")
                        .map(|v| TypeSource::Expression(NodeRef::of(v)))
                })
                .unwrap_or_else(|| TypeSource::Fixed("any".to_string()));
            let simple = name.kind() == "identifier";
            for binding in pattern_names(name) {
                let source = if simple { source.clone() } else { TypeSource::Fixed("any".to_string()) };
                self.declare(target, binding, kind, source);
            }
        }
    }

    fn bind_for_in(&mut self, node: Node<'_>, block: ScopeId) {
        let Some(kind_node) = node.child_by_field_name("kind") else {
            return;
        };
        let Some(left) = node.child_by_field_name("left") else {
            return;
        };
        let kind = match kind_node.kind() {
            "const" => DeclarationKind::Const,
            "var" => DeclarationKind::Var,
            _ => DeclarationKind::Let,
        };
        let target = if kind == DeclarationKind::Var { self.function_scope_of(block) } else { block };
        let element = match node.child_by_field_name("operator").map(|o| o.kind()) {
            Some("in") => "string",
            _ => "any",
        };
        for name in pattern_names(left) {
            self.declare(target, name, kind, TypeSource::Fixed(element.to_string()));
        }
    }

    fn bind_imports(&mut self, node: Node<'_>, scope: ScopeId) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            match current.kind() {
                "import_specifier" => {
                    let local = current
                        .child_by_field_name("alias")
                        .or_else(|| current.child_by_field_name("name"));
                    if let Some(local) = local.filter(|n| n.kind() == "identifier") {
                        self.declare(scope, local, DeclarationKind::Import, TypeSource::Fixed("any".to_string()));
                    }
                }
                "identifier" => {
                    self.declare(scope, current, DeclarationKind::Import, TypeSource::Fixed("any".to_string()));
                }
                "string" => {}
                _ => stack.extend(named_children(current).into_iter().rev()),
            }
        }
    }

    fn class_members(&self, node: Node<'_>) -> Vec<Member> {
        let Some(body) = node.child_by_field_name("body") else {
            return Vec::new();
        };

        let mut members = Vec::new();
        for item in named_children(body) {
            let Some(name) = item.child_by_field_name("name") else {
                continue;
            };
            let (kind, source) = match item.kind() {
                "method_definition" | "method_signature" | "abstract_method_signature" => {
                    (MemberKind::Method, TypeSource::Callable(NodeRef::of(item)))
                }
                "public_field_definition" | "property_signature" => {
                    let source = item
                        .child_by_field_name("type")
                        .map(|t| TypeSource::Fixed(annotation_text(t, self.source)))
                        .or_else(|| {
                            item.child_by_field_name("value")
                                .map(|v| TypeSource::Expression(NodeRef::of(v)))
                        })
                        .unwrap_or_else(|| TypeSource::Fixed("any".to_string()));
                    (MemberKind::Property, source)
                }
                _ => continue,
            };
            let member_name = node_text(name, self.source).to_string();
            if member_name == "constructor" {
                continue;
            }
            members.push(Member { name: member_name, kind, type_text: String::new(), source });
        }
        members
    }
}

/// Text of a type annotation without its leading colon.
pub(crate) fn annotation_text(annotation: Node<'_>, source: &str) -> String {
    match annotation.kind() {
        "type_annotation" | "opting_type_annotation" | "omitting_type_annotation" => annotation
            .named_child(0)
            .map(|inner| normalized_text(inner, source))
            .unwrap_or_else(|| "any".to_string()),
        _ => normalized_text(annotation, source)
            .trim_start_matches(':')
            .trim()
            .to_string(),
    }
}

fn first_identifier(node: Node<'_>) -> Option<Node<'_>> {
    let mut current = node;
    loop {
        if current.kind() == "identifier" {
            return Some(current);
        }
        current = current.named_child(0)?;
    }
}

/// Identifier nodes bound by a (possibly destructuring) pattern.
pub(crate) fn pattern_names(pattern: Node<'_>) -> Vec<Node<'_>> {
    let mut names = Vec::new();
    let mut stack = vec![pattern];
    while let Some(node) = stack.pop() {
        match node.kind() {
            "identifier" | "shorthand_property_identifier_pattern" => names.push(node),
            "pair_pattern" => stack.extend(node.child_by_field_name("value")),
            "assignment_pattern" | "object_assignment_pattern" => {
                stack.extend(node.child_by_field_name("left"))
            }
            kind if PATTERN_KINDS.contains(&kind) => {
                stack.extend(named_children(node).into_iter().rev())
            }
            _ => {}
        }
    }
    names
}

/// True when `node` is a name bound by a parameter pattern, including the
/// parameters of function types that introduce no scope of their own.
pub(crate) fn in_parameter_pattern(node: Node<'_>) -> bool {
    let mut current = node;
    while let Some(parent) = current.parent() {
        if PATTERN_KINDS.contains(&parent.kind()) {
            if matches!(parent.kind(), "assignment_pattern" | "object_assignment_pattern")
                && parent.child_by_field_name("right") == Some(current)
            {
                return false;
            }
            current = parent;
            continue;
        }
        return matches!(parent.kind(), "required_parameter" | "optional_parameter")
            && parent.child_by_field_name("pattern") == Some(current);
    }
    false
}
