//! Language vocabulary: declaration keywords, built-in types, control-flow
//! keywords and global built-in functions.

/// A built-in type name with its hover/completion description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeEntry {
    pub name: &'static str,
    pub description: &'static str,
}

/// Declaration and modifier keywords.
pub const KEYWORDS: &[&str] = &[
    "let", "const", "var", "function", "class", "interface", "type", "namespace", "module",
    "import", "export", "from", "as", "default", "extends", "implements", "static", "public",
    "private", "protected", "readonly", "abstract", "virtual", "override", "sealed", "final",
    "enum", "union", "intersection", "keyof", "typeof", "infer", "super", "this", "null",
    "undefined", "true", "false",
];

/// Built-in types, primitives first, then standard library classes, then the
/// UTS-specific wrapper types.
pub const TYPES: &[TypeEntry] = &[
    TypeEntry { name: "string", description: "Primitive string type for textual data." },
    TypeEntry { name: "number", description: "Primitive numeric type for integers and floating point values." },
    TypeEntry { name: "boolean", description: "Primitive type with the values true and false." },
    TypeEntry { name: "object", description: "Any non-primitive value." },
    TypeEntry { name: "array", description: "Ordered, indexable list of values." },
    TypeEntry { name: "any", description: "Opts out of type checking for a value." },
    TypeEntry { name: "void", description: "Absence of a return value." },
    TypeEntry { name: "never", description: "Type of values that never occur, such as a function that always throws." },
    TypeEntry { name: "unknown", description: "Type-safe counterpart of any; must be narrowed before use." },
    TypeEntry { name: "undefined", description: "Type of the undefined value." },
    TypeEntry { name: "null", description: "Type of the null value." },
    TypeEntry { name: "symbol", description: "Primitive type for unique symbol values." },
    TypeEntry { name: "bigint", description: "Primitive type for arbitrary precision integers." },
    TypeEntry { name: "Date", description: "Date and time value with calendar helpers." },
    TypeEntry { name: "RegExp", description: "Regular expression object." },
    TypeEntry { name: "Error", description: "Base class for runtime errors." },
    TypeEntry { name: "Function", description: "Type of all function values." },
    TypeEntry { name: "Promise", description: "Eventual result of an asynchronous operation." },
    TypeEntry { name: "Map", description: "Keyed collection that remembers insertion order." },
    TypeEntry { name: "Set", description: "Collection of unique values." },
    TypeEntry { name: "WeakMap", description: "Map with weakly held object keys." },
    TypeEntry { name: "WeakSet", description: "Set of weakly held objects." },
    TypeEntry { name: "ArrayBuffer", description: "Fixed-length raw binary data buffer." },
    TypeEntry { name: "DataView", description: "Low-level reader and writer over an ArrayBuffer." },
    TypeEntry { name: "Int8Array", description: "Typed array of 8-bit signed integers." },
    TypeEntry { name: "Uint8Array", description: "Typed array of 8-bit unsigned integers." },
    TypeEntry { name: "Uint8ClampedArray", description: "Typed array of 8-bit unsigned integers clamped to 0-255." },
    TypeEntry { name: "Int16Array", description: "Typed array of 16-bit signed integers." },
    TypeEntry { name: "Uint16Array", description: "Typed array of 16-bit unsigned integers." },
    TypeEntry { name: "Int32Array", description: "Typed array of 32-bit signed integers." },
    TypeEntry { name: "Uint32Array", description: "Typed array of 32-bit unsigned integers." },
    TypeEntry { name: "Float32Array", description: "Typed array of 32-bit floating point numbers." },
    TypeEntry { name: "Float64Array", description: "Typed array of 64-bit floating point numbers." },
    TypeEntry { name: "BigInt64Array", description: "Typed array of 64-bit signed big integers." },
    TypeEntry { name: "BigUint64Array", description: "Typed array of 64-bit unsigned big integers." },
    TypeEntry { name: "UTSJSONObject", description: "UTS dynamic JSON object with keyed access helpers." },
    TypeEntry { name: "UTSJSONValue", description: "Any value that can appear inside a UTS JSON document." },
    TypeEntry { name: "UTSArray", description: "UTS platform array with mutation helpers." },
    TypeEntry { name: "UTSString", description: "UTS platform string wrapper." },
    TypeEntry { name: "UTSNumber", description: "UTS platform number wrapper." },
    TypeEntry { name: "UTSBoolean", description: "UTS platform boolean wrapper." },
];

/// Control-flow and expression keywords.
pub const CONTROL_KEYWORDS: &[&str] = &[
    "if", "else", "switch", "case", "default", "for", "while", "do", "break", "continue",
    "return", "throw", "try", "catch", "finally", "in", "of", "new", "delete", "void", "with",
    "yield", "await", "async",
];

/// Global built-in functions, some qualified by their owning object.
pub const BUILTIN_FUNCTIONS: &[&str] = &[
    "console.log", "console.error", "console.warn", "console.info", "Array.isArray",
    "Object.keys", "Object.values", "Object.entries", "JSON.stringify", "JSON.parse",
    "parseInt", "parseFloat", "isNaN", "isFinite", "encodeURI", "decodeURI",
    "encodeURIComponent", "decodeURIComponent",
];

/// UTS-specific types highlighted by the advisory diagnostics pass.
pub const CUSTOM_TYPES: &[&str] = &[
    "UTSJSONObject", "UTSJSONValue", "UTSArray", "UTSString", "UTSNumber", "UTSBoolean",
];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

pub fn is_control_keyword(word: &str) -> bool {
    CONTROL_KEYWORDS.contains(&word)
}

pub fn is_builtin_function(word: &str) -> bool {
    BUILTIN_FUNCTIONS.contains(&word)
}

pub fn type_entry(name: &str) -> Option<&'static TypeEntry> {
    TYPES.iter().find(|entry| entry.name == name)
}

pub fn is_type(word: &str) -> bool {
    type_entry(word).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_is_case_sensitive() {
        assert!(is_type("Date"));
        assert!(!is_type("date"));
        assert!(is_keyword("interface"));
        assert!(!is_keyword("Interface"));
    }

    #[test]
    fn test_qualified_builtins() {
        assert!(is_builtin_function("console.log"));
        assert!(is_builtin_function("parseInt"));
        assert!(!is_builtin_function("console"));
    }

    #[test]
    fn test_custom_types_are_catalogued() {
        for name in CUSTOM_TYPES {
            assert!(is_type(name), "{} missing from type catalog", name);
        }
    }

    #[test]
    fn test_types_have_descriptions() {
        assert!(TYPES.iter().all(|entry| !entry.description.is_empty()));
        assert_eq!(TYPES.first().map(|t| t.name), Some("string"));
    }
}
