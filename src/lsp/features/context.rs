//! Cursor context detection for completion
//!
//! Only the text of the current line before the cursor is inspected. The
//! first matching rule wins:
//!
//! 1. `receiver.`       → [`CompletionContext::MemberAccess`]
//! 2. `:` + whitespace  → [`CompletionContext::TypePosition`]
//! 3. `callee(`         → [`CompletionContext::CallPosition`]
//! 4. anything else     → [`CompletionContext::Default`]

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parsers::position_utils::prefix_before;

static MEMBER_ACCESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\w$]+)\.$").expect("static pattern"));
static TYPE_POSITION: Lazy<Regex> = Lazy::new(|| Regex::new(r":\s*$").expect("static pattern"));
static CALL_POSITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:([\w$]+)\.)?([\w$]+)\($").expect("static pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionContext {
    /// After `receiver.`
    MemberAccess { receiver: String },
    /// After a type annotation colon.
    TypePosition,
    /// Right after the opening parenthesis of a call.
    CallPosition {
        callee: String,
        receiver: Option<String>,
    },
    Default,
}

impl CompletionContext {
    /// `receiver.callee` for qualified calls, otherwise the bare callee.
    pub fn qualified_callee(&self) -> Option<String> {
        match self {
            CompletionContext::CallPosition { callee, receiver: Some(receiver) } => {
                Some(format!("{}.{}", receiver, callee))
            }
            CompletionContext::CallPosition { callee, receiver: None } => Some(callee.clone()),
            _ => None,
        }
    }
}

/// Classifies the cursor at character `column` of `line`.
pub fn classify(line: &str, column: u32) -> CompletionContext {
    let before = prefix_before(line, column);

    if let Some(caps) = MEMBER_ACCESS.captures(before) {
        return CompletionContext::MemberAccess { receiver: caps[1].to_string() };
    }
    if TYPE_POSITION.is_match(before) {
        return CompletionContext::TypePosition;
    }
    if let Some(caps) = CALL_POSITION.captures(before) {
        return CompletionContext::CallPosition {
            callee: caps[2].to_string(),
            receiver: caps.get(1).map(|m| m.as_str().to_string()),
        };
    }
    CompletionContext::Default
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_end(line: &str) -> CompletionContext {
        classify(line, line.chars().count() as u32)
    }

    #[test]
    fn test_member_access() {
        assert_eq!(
            at_end("const n = Math."),
            CompletionContext::MemberAccess { receiver: "Math".to_string() }
        );
        assert_eq!(
            at_end("this.$store."),
            CompletionContext::MemberAccess { receiver: "$store".to_string() }
        );
    }

    #[test]
    fn test_type_position() {
        assert_eq!(at_end("let name: "), CompletionContext::TypePosition);
        assert_eq!(at_end("function f(a:"), CompletionContext::TypePosition);
    }

    #[test]
    fn test_call_position() {
        assert_eq!(
            at_end("let n = parseInt("),
            CompletionContext::CallPosition { callee: "parseInt".to_string(), receiver: None }
        );
        let qualified = at_end("Math.max(");
        assert_eq!(qualified.qualified_callee(), Some("Math.max".to_string()));
    }

    #[test]
    fn test_default_and_cursor_in_middle() {
        assert_eq!(at_end("let x = 1"), CompletionContext::Default);
        assert_eq!(at_end(""), CompletionContext::Default);
        // Only text before the cursor counts.
        assert_eq!(
            classify("console.log", 8),
            CompletionContext::MemberAccess { receiver: "console".to_string() }
        );
        assert_eq!(classify("console.log", 200), CompletionContext::Default);
    }
}
