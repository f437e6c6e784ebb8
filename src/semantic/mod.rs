//! Semantic analysis of a single UTS document
//!
//! [`SemanticBridge::compile`] turns document text into a [`SemanticModel`]:
//!
//! ```text
//!   text ─► parse (tree-sitter) ─► bind (scopes, declarations) ─► resolve types ─► check
//! ```
//!
//! Compiled models are shared through a content-hash cache, so repeated
//! requests against unchanged text reuse the same model. A model built from
//! text that could not be parsed at all, or that nests deeper than
//! [`MAX_SEMANTIC_DEPTH`], answers every query with nothing.

use std::ops::Range as ByteRange;
use std::sync::Arc;

use tower_lsp::lsp_types::{Diagnostic, Position, Range};
use tracing::debug;
use tree_sitter::{Node, Tree};

use crate::lexical::SymbolKind;
use crate::parsers::typescript::{ancestor_of_kind, ensure_depth, node_text, parse_code};
use crate::parsers::{CacheStats, LineIndex, ParseCache};

pub mod binder;
pub mod checker;
pub mod types;

pub use binder::{Bindings, Declaration, DeclarationKind, Member, MemberKind, Space};
pub use checker::{Category, CompilerDiagnostic};

const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "shorthand_property_identifier",
    "shorthand_property_identifier_pattern",
    "type_identifier",
    "property_identifier",
];

/// Deepest syntax tree the binder, type resolver and checker will walk.
/// Deeper documents get no semantic answers; the lexical and catalog layers
/// still serve them.
pub const MAX_SEMANTIC_DEPTH: usize = 256;

const MEMBER_OWNERS: &[&str] = &[
    "class_declaration",
    "abstract_class_declaration",
    "interface_declaration",
];

/// What the semantic layer knows about the name under a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    pub name: String,
    /// Human readable kind: `variable`, `function`, `method`, ...
    pub kind: &'static str,
    pub type_text: String,
    /// Where the name is declared.
    pub declared_at: Range,
}

/// A declaration visible from some position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub type_text: String,
}

/// Compiles documents and caches the results by content.
pub struct SemanticBridge {
    cache: ParseCache<Arc<SemanticModel>>,
}

impl SemanticBridge {
    pub fn new(capacity: usize) -> Self {
        Self { cache: ParseCache::new(capacity) }
    }

    /// The compiled model for `text`. Never fails; see [`SemanticModel::build`].
    pub fn compile(&self, text: &str) -> Arc<SemanticModel> {
        self.cache.get_or_insert_with(text, || {
            debug!("Compiling {} bytes (cache miss)", text.len());
            Arc::new(SemanticModel::build(text))
        })
    }

    /// Drops the compiled model for `text` from the cache.
    pub fn forget(&self, text: &str) {
        self.cache.invalidate(text);
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn capacity(&self) -> usize {
        self.cache.capacity()
    }
}

/// Scopes, types and diagnostics for one version of a document.
pub struct SemanticModel {
    text: String,
    line_index: LineIndex,
    tree: Option<Tree>,
    bindings: Bindings,
    diagnostics: Vec<CompilerDiagnostic>,
}

impl SemanticModel {
    /// Parses, binds and checks `text`. A parse failure or an over-deep tree
    /// yields an empty model instead of an error.
    pub fn build(text: &str) -> Self {
        let line_index = LineIndex::new(text);
        let tree = match parse_code(text).and_then(|tree| ensure_depth(tree, MAX_SEMANTIC_DEPTH)) {
            Ok(tree) => tree,
            Err(e) => {
                debug!("Semantic analysis unavailable: {}", e);
                return Self {
                    text: text.to_string(),
                    line_index,
                    tree: None,
                    bindings: Bindings::default(),
                    diagnostics: Vec::new(),
                };
            }
        };

        let root = tree.root_node();
        let mut bindings = binder::bind(root, text);
        types::resolve_all(&mut bindings, root, text);
        let diagnostics = checker::check(root, text, &bindings);
        debug!(
            "Compiled document: {} scopes, {} declarations, {} diagnostics",
            bindings.scopes.len(),
            bindings.declarations.len(),
            diagnostics.len()
        );

        Self { text: text.to_string(), line_index, tree: Some(tree), bindings, diagnostics }
    }

    pub fn is_available(&self) -> bool {
        self.tree.is_some()
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Type of the identifier at `position`, if it resolves.
    pub fn type_at(&self, position: Position) -> Option<String> {
        self.describe_at(position).map(|info| info.type_text)
    }

    /// Resolves the identifier touching `position` to its declaration.
    pub fn describe_at(&self, position: Position) -> Option<TypeInfo> {
        let root = self.tree.as_ref()?.root_node();
        let offset = self.line_index.offset(&self.text, position);
        let node = [Some(offset), offset.checked_sub(1)]
            .into_iter()
            .flatten()
            .find_map(|o| identifier_at(root, o))?;

        match node.kind() {
            "type_identifier" => self.describe_type(node),
            "property_identifier" => self.describe_member(node),
            _ => self.describe_value(node),
        }
    }

    fn describe_value(&self, node: Node<'_>) -> Option<TypeInfo> {
        let id = self.bindings.declaration_named_at(node.byte_range()).or_else(|| {
            self.bindings.resolve(node_text(node, &self.text), node.start_byte(), Space::Value)
        })?;
        let declaration = self.bindings.get(id);
        Some(self.info(declaration, declaration.kind.label(), declaration.type_text.clone()))
    }

    fn describe_type(&self, node: Node<'_>) -> Option<TypeInfo> {
        if let Some(id) = self.bindings.declaration_named_at(node.byte_range()) {
            let declaration = self.bindings.get(id);
            return Some(self.info(declaration, declaration.kind.label(), declaration.type_text.clone()));
        }
        let id = self.bindings.resolve(node_text(node, &self.text), node.start_byte(), Space::Type)?;
        let declaration = self.bindings.get(id);
        let type_text = match declaration.kind {
            DeclarationKind::TypeAlias | DeclarationKind::Import => declaration.type_text.clone(),
            _ => declaration.name.clone(),
        };
        Some(self.info(declaration, declaration.kind.label(), type_text))
    }

    fn describe_member(&self, node: Node<'_>) -> Option<TypeInfo> {
        let name = node_text(node, &self.text);
        let parent = node.parent()?;

        let owner = if parent.kind() == "member_expression" {
            let object = parent.child_by_field_name("object")?;
            if object.kind() == "this" {
                self.enclosing_owner(node)?
            } else {
                let receiver = types::expression_type_resolved(object, &self.text, &self.bindings);
                self.type_declaration(&receiver, object.start_byte())?
            }
        } else {
            // The name of a member declaration inside a class or interface body.
            self.enclosing_owner(node)?
        };

        let declaration = self.bindings.get(owner);
        let member = declaration.members.iter().find(|m| m.name == name)?;
        let kind = match member.kind {
            MemberKind::Method => "method",
            MemberKind::Property => "property",
        };
        Some(TypeInfo {
            name: member.name.clone(),
            kind,
            type_text: member.type_text.clone(),
            declared_at: self.range_of(&declaration.name_range),
        })
    }

    /// The class or interface declaration whose body contains `node`.
    fn enclosing_owner(&self, node: Node<'_>) -> Option<usize> {
        let owner = ancestor_of_kind(node, MEMBER_OWNERS)?;
        let name = owner.child_by_field_name("name")?;
        self.bindings.declaration_named_at(name.byte_range())
    }

    /// The class or interface named by a type string such as `Point` or
    /// `typeof Point`.
    fn type_declaration(&self, type_text: &str, offset: usize) -> Option<usize> {
        let (name, space) = match type_text.strip_prefix("typeof ") {
            Some(name) => (name, Space::Value),
            None => (type_text, Space::Type),
        };
        let id = self.bindings.resolve(name, offset, space)?;
        matches!(
            self.bindings.get(id).kind,
            DeclarationKind::Class | DeclarationKind::Interface
        )
        .then_some(id)
    }

    /// Members of the class or interface named by `type_text` as seen from
    /// `position`.
    pub fn members_of(&self, type_text: &str, position: Position) -> Vec<Member> {
        let offset = self.line_index.offset(&self.text, position);
        self.type_declaration(type_text, offset)
            .map(|id| self.bindings.get(id).members.clone())
            .unwrap_or_default()
    }

    /// Declarations visible from `position`, innermost scope first. A name
    /// shadowed by an inner declaration is reported once. An empty `kinds`
    /// accepts every kind.
    pub fn symbols_in_scope(&self, position: Position, kinds: &[SymbolKind]) -> Vec<ScopeSymbol> {
        if self.tree.is_none() {
            return Vec::new();
        }
        let offset = self.line_index.offset(&self.text, position);

        let mut seen: Vec<&str> = Vec::new();
        let mut symbols = Vec::new();
        for scope in self.bindings.scope_chain(offset) {
            for &id in &self.bindings.scopes[scope].declarations {
                let declaration = self.bindings.get(id);
                let Some(kind) = declaration.symbol_kind() else {
                    continue;
                };
                if seen.contains(&declaration.name.as_str()) {
                    continue;
                }
                seen.push(&declaration.name);
                if kinds.is_empty() || kinds.contains(&kind) {
                    symbols.push(ScopeSymbol {
                        name: declaration.name.clone(),
                        kind,
                        type_text: declaration.type_text.clone(),
                    });
                }
            }
        }
        symbols
    }

    /// Compiler diagnostics with editor positions. The `source` field is
    /// left for the caller to fill in.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .iter()
            .map(|d| Diagnostic {
                range: self.range_of(&d.byte_range),
                severity: Some(checker::severity(d.category)),
                message: d.message.clone(),
                ..Default::default()
            })
            .collect()
    }

    fn info(&self, declaration: &Declaration, kind: &'static str, type_text: String) -> TypeInfo {
        TypeInfo {
            name: declaration.name.clone(),
            kind,
            type_text,
            declared_at: self.range_of(&declaration.name_range),
        }
    }

    fn range_of(&self, bytes: &ByteRange<usize>) -> Range {
        self.line_index.range(&self.text, bytes.start, bytes.end)
    }
}

fn identifier_at(root: Node<'_>, offset: usize) -> Option<Node<'_>> {
    let node = root.descendant_for_byte_range(offset, offset)?;
    (IDENTIFIER_KINDS.contains(&node.kind()) && node.start_byte() <= offset && offset < node.end_byte())
        .then_some(node)
}
