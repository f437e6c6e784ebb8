//! Request handlers behind the language server
//!
//! Every feature is a plain synchronous function over the document text, and
//! a compiled [`SemanticModel`](crate::semantic::SemanticModel) where types
//! matter.
//!
//! ```text
//!                 ┌──────────── sources.rs ────────────┐
//!                 │ SignatureCatalog  LexicalSource     │
//!                 │ SemanticSource    VocabularyCatalog │
//!                 └───────┬───────────────────┬─────────┘
//!   context.rs ──► completion.rs          hover.rs
//!
//!   goto_definition.rs, references.rs, document_symbols.rs  (lexical)
//!   signature_help.rs                                      (catalog + lexical)
//!   diagnostics.rs                                         (semantic + advisory)
//! ```

pub mod completion;
pub mod context;
pub mod diagnostics;
pub mod document_symbols;
pub mod goto_definition;
pub mod hover;
pub mod references;
pub mod signature_help;
pub mod sources;

pub use completion::{CompletionOptions, complete};
pub use context::{CompletionContext, classify};
pub use diagnostics::{DIAGNOSTIC_SOURCE, validate};
pub use sources::{Candidate, CandidateKind, SymbolSource};
