//! Error types for the analysis engine
//!
//! Analysis never surfaces these to the editor. Every capability degrades to
//! "no answer" after logging; the enum exists so internal layers can report
//! *why* an answer was unavailable.

use thiserror::Error;

/// Reasons an analysis layer could not produce an answer.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The tree-sitter grammar could not be loaded into a parser.
    #[error("failed to load the UTS grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// The parser gave up without producing a syntax tree.
    #[error("parser produced no syntax tree for {len} bytes of input")]
    NoTree { len: usize },

    /// The syntax tree is nested too deeply for the semantic passes.
    #[error("syntax tree nested deeper than {limit} levels")]
    TooDeep { limit: usize },

    /// A search pattern built from document text failed to compile.
    #[error("invalid search pattern for `{word}`: {source}")]
    Pattern {
        word: String,
        #[source]
        source: regex::Error,
    },
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
