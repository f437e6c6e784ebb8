//! Hover tooltips
//!
//! # Architecture
//!
//! ```text
//! textDocument/hover
//!       ↓
//! word_at(line, column)
//!       ├─→ SemanticSource      (resolved declaration and type)
//!       ├─→ SignatureCatalog    (Math.max, parseInt(...), UTSString.split)
//!       ├─→ LexicalSource       (declaration lines, inferred types)
//!       └─→ VocabularyCatalog   (keywords, types, built-ins)
//!       ↓
//! first answer → Markdown sections → Hover
//! ```

use tower_lsp::lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind, Position, Range};
use tracing::debug;

use crate::lexical::word_at;
use crate::lsp::features::sources::{Candidate, HOVER_LAYERS, Query, first_description};
use crate::parsers::position_utils::line_text;
use crate::semantic::SemanticModel;

/// One block of a hover tooltip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverSection {
    /// `**name** - kind`
    Title { name: String, kind: String },
    /// Source shown in a fenced block.
    Code(String),
    /// Free text.
    Note(String),
}

impl HoverSection {
    fn render(&self) -> String {
        match self {
            HoverSection::Title { name, kind } => format!("**{}** - {}", name, kind),
            HoverSection::Code(code) => format!("```uts\n{}\n```", code),
            HoverSection::Note(note) => note.clone(),
        }
    }
}

/// Joins sections with blank lines.
pub fn render_markdown(sections: &[HoverSection]) -> String {
    sections.iter().map(HoverSection::render).collect::<Vec<_>>().join("\n\n")
}

/// Sections describing one answer.
pub fn sections_for(candidate: &Candidate) -> Vec<HoverSection> {
    let mut sections = vec![HoverSection::Title {
        name: candidate.name.clone(),
        kind: candidate.kind.label(),
    }];
    if let Some(signature) = &candidate.signature {
        sections.push(HoverSection::Code(signature.clone()));
    }
    if let Some(documentation) = &candidate.documentation {
        sections.push(HoverSection::Note(documentation.clone()));
    }
    if let Some(line) = candidate.line {
        sections.push(HoverSection::Note(format!("Declared on line {}.", line + 1)));
    }
    sections
}

/// Hover for the identifier at `position`, or `None` when nothing knows it.
pub fn hover(text: &str, position: Position, model: &SemanticModel) -> Option<Hover> {
    let line = line_text(text, position.line);
    let word = word_at(line, position.character)?;
    let query = Query { text, position, line, model };

    let Some(candidate) = first_description(HOVER_LAYERS, &query, &word) else {
        debug!("No hover for '{}'", word.text);
        return None;
    };

    Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: render_markdown(&sections_for(&candidate)),
        }),
        range: Some(Range::new(
            Position::new(position.line, word.start),
            Position::new(position.line, word.end),
        )),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn markdown(text: &str, line: u32, character: u32) -> Option<String> {
        let model = SemanticModel::build(text);
        hover(text, Position::new(line, character), &model).map(|h| match h.contents {
            HoverContents::Markup(markup) => markup.value,
            _ => String::new(),
        })
    }

    #[test]
    fn test_render_markdown() {
        let rendered = render_markdown(&[
            HoverSection::Title { name: "x".into(), kind: "variable".into() },
            HoverSection::Code("let x: number".into()),
            HoverSection::Note("Declared on line 1.".into()),
        ]);
        assert_eq!(rendered, "**x** - variable\n\n```uts\nlet x: number\n```\n\nDeclared on line 1.");
    }

    #[test]
    fn test_semantic_layer_first() {
        let text = indoc! {r#"
            function add(a: number, b: number): number {
              return a + b;
            }
            const total = add(1, 2);
        "#};
        let value = markdown(text, 3, 8).expect("hover");
        assert!(value.starts_with("**total** - constant"), "{}", value);
        assert!(value.contains("(constant) total: number"));
        assert!(value.contains("Declared on line 4."));
    }

    #[test]
    fn test_catalog_and_vocabulary_layers() {
        let value = markdown("Math.max(1, 2);", 0, 6).expect("hover");
        assert!(value.starts_with("**Math.max** - function"));
        assert!(value.contains("Math.max(...values: number[]): number"));

        let value = markdown("while", 0, 2).expect("hover");
        assert!(value.starts_with("**while** - UTS control keyword"));
    }

    #[test]
    fn test_range_covers_word_and_blank_is_none() {
        let text = "let count = 1;";
        let model = SemanticModel::build(text);
        let h = hover(text, Position::new(0, 6), &model).expect("hover");
        assert_eq!(h.range, Some(Range::new(Position::new(0, 4), Position::new(0, 9))));

        assert!(markdown("   ", 0, 1).is_none());
        assert!(markdown("unknownThing", 0, 3).is_none());
    }
}
