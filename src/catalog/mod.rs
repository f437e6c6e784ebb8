//! Static knowledge catalogs
//!
//! Built-in vocabulary of the UTS language: keywords, types, control flow,
//! global functions, object members, class methods, call signatures and code
//! snippets. Everything here is immutable, insertion ordered data; lookups are
//! exact and case sensitive.

pub mod keywords;
pub mod members;
pub mod signatures;
pub mod snippets;

pub use keywords::{
    BUILTIN_FUNCTIONS, CONTROL_KEYWORDS, CUSTOM_TYPES, KEYWORDS, TYPES, TypeEntry,
    is_builtin_function, is_control_keyword, is_keyword, is_type, type_entry,
};
pub use members::{
    CLASS_METHODS, MethodSignature, OBJECT_MEMBERS, class_method, class_methods, is_object,
    object_members,
};
pub use signatures::{FUNCTION_SIGNATURES, FunctionSignature, function_signature};
pub use snippets::{SNIPPETS, Snippet};

/// Names that resolve without a declaration in the document.
///
/// Covers every catalogued object, type and bare built-in function, plus the
/// host globals a UTS program can reference directly.
pub fn is_global_name(name: &str) -> bool {
    const HOST_GLOBALS: &[&str] = &[
        "undefined", "NaN", "Infinity", "globalThis", "arguments", "require", "module",
        "exports", "setTimeout", "clearTimeout", "setInterval", "clearInterval", "Symbol",
        "BigInt", "Boolean", "Reflect", "Proxy", "Intl", "uni", "plus", "getApp",
        "getCurrentPages",
        // Web and runtime hosts
        "window", "document", "navigator", "location", "history", "self", "global",
        "process", "Buffer", "fetch", "localStorage", "sessionStorage", "queueMicrotask",
        "structuredClone", "requestAnimationFrame", "cancelAnimationFrame", "setImmediate",
        "clearImmediate", "atob", "btoa", "alert", "URL", "URLSearchParams", "TextEncoder",
        "TextDecoder", "AbortController", "Event", "EventTarget", "Blob", "File",
        "FormData", "Headers", "Request", "Response", "WebSocket", "Worker",
        "XMLHttpRequest",
        // Mini-program hosts
        "wx", "my", "swan", "tt", "qq", "jd",
    ];

    HOST_GLOBALS.contains(&name)
        || is_object(name)
        || is_type(name)
        || BUILTIN_FUNCTIONS
            .iter()
            .any(|builtin| builtin.split('.').next() == Some(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_names() {
        for name in ["window", "document", "globalThis", "setTimeout", "uni", "Math", "UTSArray", "parseInt"] {
            assert!(is_global_name(name), "{} should be global", name);
        }
        assert!(!is_global_name("missing"));
        assert!(!is_global_name("Window"));
    }
}
