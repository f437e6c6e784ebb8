//! Lexical analysis over raw document text
//!
//! Everything in this module works line by line with regular expressions and
//! never needs the document to be syntactically valid. It is the fallback
//! layer that keeps completion, hover and navigation useful while the user is
//! in the middle of typing broken code.
//!
//! ```text
//!   text ──► scanner::scan ──► Vec<SymbolCandidate>   (document symbols, define, hover)
//!   text ──► patterns       ──► words, occurrences     (references, cursor words)
//!   rhs  ──► inference      ──► "string" | "number" …  (hover on untyped variables)
//! ```

use std::fmt;

use tower_lsp::lsp_types::Range;

pub mod inference;
pub mod patterns;
pub mod scanner;

pub use inference::infer_initializer_type;
pub use patterns::{WordAt, find_word_occurrences, literal_word_pattern, word_at};
pub use scanner::{MethodLine, class_body_methods, find_declaration, scan};

/// Declaration kinds recognized by the scanner and reported by the binder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    GenericFunction,
    Class,
    Interface,
    TypeAlias,
    Enum,
    Namespace,
    Module,
    Variable,
    Constant,
}

impl SymbolKind {
    pub const ALL: &'static [SymbolKind] = &[
        SymbolKind::Function,
        SymbolKind::GenericFunction,
        SymbolKind::Class,
        SymbolKind::Interface,
        SymbolKind::TypeAlias,
        SymbolKind::Enum,
        SymbolKind::Namespace,
        SymbolKind::Module,
        SymbolKind::Variable,
        SymbolKind::Constant,
    ];

    pub fn is_function(self) -> bool {
        matches!(self, SymbolKind::Function | SymbolKind::GenericFunction)
    }

    pub fn is_variable(self) -> bool {
        matches!(self, SymbolKind::Variable | SymbolKind::Constant)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SymbolKind::Function => "function",
            SymbolKind::GenericFunction => "generic function",
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::TypeAlias => "type alias",
            SymbolKind::Enum => "enum",
            SymbolKind::Namespace => "namespace",
            SymbolKind::Module => "module",
            SymbolKind::Variable => "variable",
            SymbolKind::Constant => "constant",
        };
        f.write_str(label)
    }
}

/// A declaration found by the lexical scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolCandidate {
    pub name: String,
    pub kind: SymbolKind,
    /// The whole declaring line.
    pub range: Range,
    /// Just the declared name.
    pub selection_range: Range,
    /// Column of the introducing keyword (`function`, `class`, `let`, ...).
    pub keyword_column: u32,
    /// Annotation, return type or aliased type as written.
    pub declared_type: Option<String>,
    /// Right-hand side of a variable declaration.
    pub initializer: Option<String>,
    /// Declaration header from the keyword through the type, e.g.
    /// `function add(a: number, b: number): number`.
    pub signature: String,
}

impl SymbolCandidate {
    pub fn line(&self) -> u32 {
        self.range.start.line
    }
}
