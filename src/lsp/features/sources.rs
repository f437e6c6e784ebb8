//! Knowledge sources behind completion and hover
//!
//! Each source answers the same two questions, returning the same
//! [`Candidate`] type:
//!
//! - `members`: what can follow `receiver.`?
//! - `describe`: what is the word under the cursor?
//!
//! The engines are ordered lists of sources; the first non-empty answer wins.
//!
//! ```text
//!   members:  SignatureCatalog ─► LexicalSource ─► SemanticSource
//!   describe: SemanticSource ─► SignatureCatalog ─► LexicalSource ─► VocabularyCatalog
//! ```

use tower_lsp::lsp_types::{CompletionItemKind, Position};

use crate::catalog;
use crate::lexical::inference::{UNKNOWN_TYPE, infer_initializer_type};
use crate::lexical::patterns::{WordAt, followed_by_call, receiver_before};
use crate::lexical::{SymbolKind, class_body_methods, find_declaration};
use crate::semantic::{MemberKind, SemanticModel};

/// Inputs shared by every source for one request.
pub struct Query<'a> {
    pub text: &'a str,
    pub position: Position,
    /// Text of the line holding `position`.
    pub line: &'a str,
    pub model: &'a SemanticModel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// Member of a catalogued global object.
    ObjectMember,
    Method,
    Property,
    Function,
    /// Declaration found by the lexical scanner.
    Declaration(SymbolKind),
    /// Declaration resolved by the semantic model, labelled by its kind.
    Semantic(&'static str),
    Keyword,
    ControlKeyword,
    Type,
    BuiltinFunction,
}

impl CandidateKind {
    pub fn label(self) -> String {
        match self {
            CandidateKind::ObjectMember => "object member".to_string(),
            CandidateKind::Method => "method".to_string(),
            CandidateKind::Property => "property".to_string(),
            CandidateKind::Function => "function".to_string(),
            CandidateKind::Declaration(kind) => kind.to_string(),
            CandidateKind::Semantic(label) => label.to_string(),
            CandidateKind::Keyword => "UTS keyword".to_string(),
            CandidateKind::ControlKeyword => "UTS control keyword".to_string(),
            CandidateKind::Type => "UTS type".to_string(),
            CandidateKind::BuiltinFunction => "UTS built-in function".to_string(),
        }
    }

    pub fn completion_kind(self) -> CompletionItemKind {
        match self {
            CandidateKind::ObjectMember | CandidateKind::Method => CompletionItemKind::METHOD,
            CandidateKind::Property => CompletionItemKind::PROPERTY,
            CandidateKind::Function | CandidateKind::BuiltinFunction => CompletionItemKind::FUNCTION,
            CandidateKind::Declaration(kind) => symbol_completion_kind(kind),
            CandidateKind::Semantic(_) => CompletionItemKind::VARIABLE,
            CandidateKind::Keyword | CandidateKind::ControlKeyword => CompletionItemKind::KEYWORD,
            CandidateKind::Type => CompletionItemKind::TYPE_PARAMETER,
        }
    }
}

pub fn symbol_completion_kind(kind: SymbolKind) -> CompletionItemKind {
    match kind {
        SymbolKind::Function | SymbolKind::GenericFunction => CompletionItemKind::FUNCTION,
        SymbolKind::Class => CompletionItemKind::CLASS,
        SymbolKind::Interface => CompletionItemKind::INTERFACE,
        SymbolKind::TypeAlias => CompletionItemKind::TYPE_PARAMETER,
        SymbolKind::Enum => CompletionItemKind::ENUM,
        SymbolKind::Namespace | SymbolKind::Module => CompletionItemKind::MODULE,
        SymbolKind::Variable => CompletionItemKind::VARIABLE,
        SymbolKind::Constant => CompletionItemKind::CONSTANT,
    }
}

/// One answer from a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub kind: CandidateKind,
    /// Code shown in a hover block, or the completion detail.
    pub signature: Option<String>,
    /// Declared or inferred type, when the source knows one.
    pub type_text: Option<String>,
    pub documentation: Option<String>,
    /// Zero-based line of the declaration the answer came from.
    pub line: Option<u32>,
}

impl Candidate {
    fn new(name: impl Into<String>, kind: CandidateKind) -> Self {
        Self {
            name: name.into(),
            kind,
            signature: None,
            type_text: None,
            documentation: None,
            line: None,
        }
    }

    fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

/// A knowledge source consulted by the completion and hover engines.
pub trait SymbolSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Members offered after `receiver.`.
    fn members(&self, query: &Query<'_>, receiver: &str) -> Vec<Candidate> {
        let _ = (query, receiver);
        Vec::new()
    }

    /// Description of `word`, the identifier under the cursor.
    fn describe(&self, query: &Query<'_>, word: &WordAt) -> Option<Candidate> {
        let _ = (query, word);
        None
    }
}

/// Sources for member-access completion, in priority order.
pub const MEMBER_SOURCES: &[&dyn SymbolSource] = &[&SignatureCatalog, &LexicalSource, &SemanticSource];

/// Sources for hover, in priority order.
pub const HOVER_LAYERS: &[&dyn SymbolSource] =
    &[&SemanticSource, &SignatureCatalog, &LexicalSource, &VocabularyCatalog];

/// Object member lists, class method tables and call signatures.
pub struct SignatureCatalog;

impl SymbolSource for SignatureCatalog {
    fn name(&self) -> &'static str {
        "signature catalog"
    }

    fn members(&self, _query: &Query<'_>, receiver: &str) -> Vec<Candidate> {
        if let Some(members) = catalog::object_members(receiver) {
            return members
                .iter()
                .map(|member| {
                    let candidate = Candidate::new(*member, CandidateKind::ObjectMember)
                        .with_signature(format!("Member of {}", receiver));
                    match catalog::function_signature(&format!("{}.{}", receiver, member)) {
                        Some(sig) => candidate.with_documentation(sig.description),
                        None => candidate
                            .with_documentation(format!("Accesses the {} member of {}.", member, receiver)),
                    }
                })
                .collect();
        }

        catalog::class_methods(receiver)
            .map(|methods| {
                methods
                    .iter()
                    .map(|method| {
                        Candidate::new(method.name, CandidateKind::Method)
                            .with_signature(format!("{}{}", method.name, method.signature))
                            .with_documentation(method.description)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn describe(&self, query: &Query<'_>, word: &WordAt) -> Option<Candidate> {
        if let Some(receiver) = receiver_before(query.line, word) {
            let qualified = format!("{}.{}", receiver, word.text);
            if let Some(sig) = catalog::function_signature(&qualified) {
                return Some(
                    Candidate::new(qualified, CandidateKind::Function)
                        .with_signature(sig.label())
                        .with_documentation(sig.description),
                );
            }
            if catalog::object_members(&receiver).is_some_and(|members| members.contains(&word.text.as_str())) {
                return Some(
                    Candidate::new(qualified, CandidateKind::ObjectMember)
                        .with_documentation(format!("The {} method or property of the {} object.", word.text, receiver)),
                );
            }
            if let Some(method) = catalog::class_method(&receiver, &word.text) {
                return Some(
                    Candidate::new(qualified, CandidateKind::Method)
                        .with_signature(format!("{}{}", method.name, method.signature))
                        .with_documentation(method.description),
                );
            }
            return None;
        }

        if followed_by_call(query.line, word) {
            let sig = catalog::function_signature(&word.text)?;
            return Some(
                Candidate::new(&word.text, CandidateKind::Function)
                    .with_signature(sig.label())
                    .with_documentation(sig.description),
            );
        }
        None
    }
}

/// Declarations found by scanning the raw text.
pub struct LexicalSource;

/// Declaration kinds a lexical hover reports, in priority order per line.
const HOVER_DECLARATIONS: &[SymbolKind] = &[
    SymbolKind::GenericFunction,
    SymbolKind::Function,
    SymbolKind::Class,
    SymbolKind::Interface,
    SymbolKind::Variable,
    SymbolKind::Constant,
];

impl SymbolSource for LexicalSource {
    fn name(&self) -> &'static str {
        "lexical scan"
    }

    fn members(&self, query: &Query<'_>, receiver: &str) -> Vec<Candidate> {
        class_methods_of(query.text, receiver)
    }

    fn describe(&self, query: &Query<'_>, word: &WordAt) -> Option<Candidate> {
        let found = find_declaration(query.text, &word.text, HOVER_DECLARATIONS)?;

        let (signature, type_text) = if !found.kind.is_variable() {
            (found.signature.clone(), found.declared_type.clone())
        } else if let Some(declared) = &found.declared_type {
            (found.signature.clone(), Some(declared.clone()))
        } else {
            let inferred = found
                .initializer
                .as_deref()
                .map(|rhs| infer_initializer_type(rhs, query.text))
                .unwrap_or_else(|| UNKNOWN_TYPE.to_string());
            (format!("{}: {}", found.signature, inferred), Some(inferred))
        };

        let mut candidate = Candidate::new(found.name.clone(), CandidateKind::Declaration(found.kind))
            .with_signature(signature);
        candidate.type_text = type_text;
        candidate.line = Some(found.line());
        Some(candidate)
    }
}

/// Answers backed by the compiled semantic model.
pub struct SemanticSource;

impl SymbolSource for SemanticSource {
    fn name(&self) -> &'static str {
        "semantic model"
    }

    /// When `receiver` is a variable whose type names a class declared in the
    /// document, offers that class's methods.
    fn members(&self, query: &Query<'_>, receiver: &str) -> Vec<Candidate> {
        let Some(type_text) = query
            .model
            .symbols_in_scope(query.position, &[])
            .into_iter()
            .find(|symbol| symbol.name == receiver)
            .map(|symbol| symbol.type_text)
        else {
            return Vec::new();
        };
        let class_name = type_text.strip_prefix("typeof ").unwrap_or(&type_text);

        let scanned = class_methods_of(query.text, class_name);
        if !scanned.is_empty() {
            return scanned;
        }

        query
            .model
            .members_of(&type_text, query.position)
            .into_iter()
            .map(|member| {
                let kind = match member.kind {
                    MemberKind::Method => CandidateKind::Method,
                    MemberKind::Property => CandidateKind::Property,
                };
                let mut candidate =
                    Candidate::new(member.name, kind).with_signature(member.type_text.clone());
                candidate.type_text = Some(member.type_text);
                candidate
            })
            .collect()
    }

    fn describe(&self, query: &Query<'_>, _word: &WordAt) -> Option<Candidate> {
        let info = query.model.describe_at(query.position)?;
        let mut candidate = Candidate::new(info.name.clone(), CandidateKind::Semantic(info.kind))
            .with_signature(format!("({}) {}: {}", info.kind, info.name, info.type_text));
        candidate.type_text = Some(info.type_text);
        candidate.line = Some(info.declared_at.start.line);
        Some(candidate)
    }
}

/// Keywords, types, control keywords and built-in functions.
pub struct VocabularyCatalog;

impl SymbolSource for VocabularyCatalog {
    fn name(&self) -> &'static str {
        "vocabulary catalog"
    }

    fn describe(&self, query: &Query<'_>, word: &WordAt) -> Option<Candidate> {
        let text = word.text.as_str();
        if catalog::is_keyword(text) {
            return Some(
                Candidate::new(text, CandidateKind::Keyword)
                    .with_documentation("Declares variables, constants, functions and other program elements."),
            );
        }
        if let Some(entry) = catalog::type_entry(text) {
            return Some(Candidate::new(text, CandidateKind::Type).with_documentation(entry.description));
        }
        if catalog::is_control_keyword(text) {
            return Some(
                Candidate::new(text, CandidateKind::ControlKeyword)
                    .with_documentation("Controls program flow."),
            );
        }

        let qualified = receiver_before(query.line, word).map(|receiver| format!("{}.{}", receiver, text));
        let name = [qualified.as_deref(), Some(text)]
            .into_iter()
            .flatten()
            .find(|name| catalog::is_builtin_function(name))?;
        let candidate = Candidate::new(name, CandidateKind::BuiltinFunction)
            .with_documentation("Built-in function provided by the UTS runtime.");
        Some(match catalog::function_signature(name) {
            Some(sig) => candidate.with_signature(sig.label()),
            None => candidate,
        })
    }
}

fn class_methods_of(text: &str, class_name: &str) -> Vec<Candidate> {
    class_body_methods(text, class_name)
        .into_iter()
        .map(|method| {
            let signature = format!("{}{}", method.name, method.signature());
            let mut candidate = Candidate::new(method.name, CandidateKind::Method).with_signature(signature);
            candidate.type_text = Some(method.return_type);
            candidate
        })
        .collect()
}

/// First non-empty member list from `sources`.
pub fn first_members(sources: &[&dyn SymbolSource], query: &Query<'_>, receiver: &str) -> Vec<Candidate> {
    for source in sources {
        let members = source.members(query, receiver);
        if !members.is_empty() {
            tracing::debug!("{} members of {} from {}", members.len(), receiver, source.name());
            return members;
        }
    }
    Vec::new()
}

/// First description of `word` from `sources`.
pub fn first_description(sources: &[&dyn SymbolSource], query: &Query<'_>, word: &WordAt) -> Option<Candidate> {
    sources.iter().find_map(|source| {
        let found = source.describe(query, word)?;
        tracing::debug!("Described {} via {}", word.text, source.name());
        Some(found)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::word_at;
    use indoc::indoc;

    fn query<'a>(text: &'a str, line: u32, model: &'a SemanticModel) -> Query<'a> {
        Query {
            text,
            position: Position::new(line, 0),
            line: text.split('\n').nth(line as usize).unwrap_or(""),
            model,
        }
    }

    #[test]
    fn test_catalog_members_take_priority() {
        let text = "Math.";
        let model = SemanticModel::build(text);
        let q = query(text, 0, &model);
        let members = first_members(MEMBER_SOURCES, &q, "Math");
        assert_eq!(members.first().map(|c| c.name.as_str()), Some("abs"));
        assert!(members.iter().all(|c| c.kind == CandidateKind::ObjectMember));

        let string_methods = first_members(MEMBER_SOURCES, &q, "UTSString");
        assert!(string_methods.iter().any(|c| c.signature.as_deref() == Some("split(separator: string): string[]")));
    }

    #[test]
    fn test_class_body_then_semantic_receiver() {
        let text = indoc! {r#"
            class Counter {
              increment(step: number): number {
                return step;
              }
            }
            const counter = new Counter();
            counter.increment(1);
        "#};
        let model = SemanticModel::build(text);
        let q = Query { text, position: Position::new(6, 8), line: "counter.increment(1);", model: &model };

        let by_class = first_members(MEMBER_SOURCES, &q, "Counter");
        assert_eq!(by_class.len(), 1);
        assert_eq!(by_class[0].signature.as_deref(), Some("increment(step: number): number"));

        let by_variable = first_members(MEMBER_SOURCES, &q, "counter");
        assert_eq!(by_variable.len(), 1);
        assert_eq!(by_variable[0].name, "increment");

        assert!(first_members(MEMBER_SOURCES, &q, "nothing").is_empty());
    }

    #[test]
    fn test_signature_catalog_describes_qualified_and_called_names() {
        let text = "let m = Math.max(1, 2);\nlet n = parseInt(\"4\");";
        let model = SemanticModel::build(text);

        let q = query(text, 0, &model);
        let word = word_at(q.line, 14).expect("word");
        let found = SignatureCatalog.describe(&q, &word).expect("catalogued");
        assert_eq!(found.name, "Math.max");

        let q = query(text, 1, &model);
        let word = word_at(q.line, 10).expect("word");
        let found = SignatureCatalog.describe(&q, &word).expect("catalogued");
        assert_eq!(found.kind, CandidateKind::Function);
        assert!(found.signature.is_some_and(|s| s.starts_with("parseInt(")));
    }

    #[test]
    fn test_lexical_describe_infers_untyped_variables() {
        let text = "let greeting = \"hi\";\nlet total: number = 1;";
        let model = SemanticModel::build(text);
        let q = query(text, 0, &model);
        let word = word_at(q.line, 5).expect("word");
        let found = LexicalSource.describe(&q, &word).expect("declared");
        assert_eq!(found.type_text.as_deref(), Some("string"));
        assert_eq!(found.signature.as_deref(), Some("let greeting: string"));

        let q = query(text, 1, &model);
        let word = word_at(q.line, 5).expect("word");
        let found = LexicalSource.describe(&q, &word).expect("declared");
        assert_eq!(found.signature.as_deref(), Some("let total: number"));
        assert_eq!(found.line, Some(1));
    }

    #[test]
    fn test_vocabulary_order() {
        let text = "default";
        let model = SemanticModel::build(text);
        let q = query(text, 0, &model);
        let word = word_at(q.line, 0).expect("word");
        // `default` is both a keyword and a control keyword; keywords come first.
        assert_eq!(VocabularyCatalog.describe(&q, &word).map(|c| c.kind), Some(CandidateKind::Keyword));

        let text = "console.log";
        let q = query(text, 0, &model);
        let word = word_at(text, 9).expect("word");
        let found = VocabularyCatalog.describe(&q, &word).expect("builtin");
        assert_eq!(found.name, "console.log");
    }
}
