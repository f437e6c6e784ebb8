//! Member tables for built-in objects and classes
//!
//! Two registries feed member-access completion:
//!
//! - [`OBJECT_MEMBERS`]: global objects and their member names, in the order
//!   they are offered to the editor.
//! - [`CLASS_METHODS`]: classes not covered above, with full method
//!   signatures and descriptions.

/// Member names available on a global object.
#[derive(Debug, Clone, Copy)]
pub struct ObjectMembers {
    pub object: &'static str,
    pub members: &'static [&'static str],
}

/// A documented method on a built-in class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSignature {
    pub name: &'static str,
    /// Parameter list and return type, e.g. `(separator?: string): string[]`.
    pub signature: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct ClassMethods {
    pub class: &'static str,
    pub methods: &'static [MethodSignature],
}

pub const OBJECT_MEMBERS: &[ObjectMembers] = &[
    ObjectMembers { object: "console", members: &["log", "error", "warn", "info", "debug", "time", "timeEnd"] },
    ObjectMembers { object: "Array", members: &["isArray", "from", "of"] },
    ObjectMembers { object: "Object", members: &["keys", "values", "entries", "assign", "create", "defineProperty"] },
    ObjectMembers { object: "JSON", members: &["stringify", "parse"] },
    ObjectMembers { object: "Math", members: &["abs", "ceil", "floor", "round", "max", "min", "pow", "sqrt", "random"] },
    ObjectMembers { object: "String", members: &["fromCharCode", "fromCodePoint"] },
    ObjectMembers { object: "Number", members: &["isFinite", "isInteger", "isNaN", "parseInt", "parseFloat"] },
    ObjectMembers { object: "Date", members: &["now", "parse", "UTC"] },
    ObjectMembers { object: "RegExp", members: &["test", "exec"] },
    ObjectMembers { object: "Promise", members: &["resolve", "reject", "all", "race", "allSettled"] },
    ObjectMembers { object: "Map", members: &["set", "get", "has", "delete", "clear", "size"] },
    ObjectMembers { object: "Set", members: &["add", "has", "delete", "clear", "size"] },
    ObjectMembers { object: "UTSJSONObject", members: &["get", "set", "has", "delete", "keys", "values", "entries"] },
    ObjectMembers { object: "UTSArray", members: &["push", "pop", "shift", "unshift", "splice", "slice", "indexOf", "includes"] },
];

macro_rules! method {
    ($name:literal, $signature:literal, $description:literal) => {
        MethodSignature { name: $name, signature: $signature, description: $description }
    };
}

pub const CLASS_METHODS: &[ClassMethods] = &[
    ClassMethods {
        class: "UTSString",
        methods: &[
            method!("charAt", "(index: number): string", "Returns the character at the given index."),
            method!("indexOf", "(search: string, position?: number): number", "Returns the index of the first occurrence, or -1."),
            method!("includes", "(search: string): boolean", "Returns true if the string contains the search text."),
            method!("split", "(separator: string): string[]", "Splits the string into substrings."),
            method!("substring", "(start: number, end?: number): string", "Returns the part of the string between two indices."),
            method!("toUpperCase", "(): string", "Converts all characters to upper case."),
            method!("toLowerCase", "(): string", "Converts all characters to lower case."),
            method!("trim", "(): string", "Removes leading and trailing whitespace."),
            method!("replace", "(pattern: string | RegExp, replacement: string): string", "Replaces the first match of a pattern."),
            method!("startsWith", "(search: string): boolean", "Returns true if the string begins with the search text."),
            method!("endsWith", "(search: string): boolean", "Returns true if the string ends with the search text."),
        ],
    },
    ClassMethods {
        class: "UTSNumber",
        methods: &[
            method!("toFixed", "(digits?: number): string", "Formats the number using fixed-point notation."),
            method!("toPrecision", "(precision?: number): string", "Formats the number to the given precision."),
            method!("toString", "(radix?: number): string", "Returns the string representation in the given radix."),
            method!("valueOf", "(): number", "Returns the primitive number value."),
        ],
    },
    ClassMethods {
        class: "UTSBoolean",
        methods: &[
            method!("toString", "(): string", "Returns \"true\" or \"false\"."),
            method!("valueOf", "(): boolean", "Returns the primitive boolean value."),
        ],
    },
    ClassMethods {
        class: "UTSJSONValue",
        methods: &[
            method!("toString", "(): string", "Serializes the value to JSON text."),
            method!("valueOf", "(): any", "Returns the underlying value."),
        ],
    },
    ClassMethods {
        class: "Error",
        methods: &[
            method!("toString", "(): string", "Returns the error name and message."),
        ],
    },
    ClassMethods {
        class: "WeakMap",
        methods: &[
            method!("get", "(key: object): any", "Returns the value stored for the key."),
            method!("set", "(key: object, value: any): WeakMap", "Stores a value for the key."),
            method!("has", "(key: object): boolean", "Returns true if the key is present."),
            method!("delete", "(key: object): boolean", "Removes the key and its value."),
        ],
    },
    ClassMethods {
        class: "WeakSet",
        methods: &[
            method!("add", "(value: object): WeakSet", "Adds an object to the set."),
            method!("has", "(value: object): boolean", "Returns true if the object is in the set."),
            method!("delete", "(value: object): boolean", "Removes the object from the set."),
        ],
    },
    ClassMethods {
        class: "ArrayBuffer",
        methods: &[
            method!("slice", "(begin: number, end?: number): ArrayBuffer", "Copies a byte range into a new buffer."),
        ],
    },
    ClassMethods {
        class: "DataView",
        methods: &[
            method!("getInt8", "(byteOffset: number): number", "Reads a signed 8-bit integer."),
            method!("getUint8", "(byteOffset: number): number", "Reads an unsigned 8-bit integer."),
            method!("getInt32", "(byteOffset: number, littleEndian?: boolean): number", "Reads a signed 32-bit integer."),
            method!("getFloat64", "(byteOffset: number, littleEndian?: boolean): number", "Reads a 64-bit float."),
            method!("setInt8", "(byteOffset: number, value: number): void", "Writes a signed 8-bit integer."),
            method!("setUint8", "(byteOffset: number, value: number): void", "Writes an unsigned 8-bit integer."),
            method!("setInt32", "(byteOffset: number, value: number, littleEndian?: boolean): void", "Writes a signed 32-bit integer."),
            method!("setFloat64", "(byteOffset: number, value: number, littleEndian?: boolean): void", "Writes a 64-bit float."),
        ],
    },
];

/// Member names of a global object, if catalogued.
pub fn object_members(object: &str) -> Option<&'static [&'static str]> {
    OBJECT_MEMBERS
        .iter()
        .find(|entry| entry.object == object)
        .map(|entry| entry.members)
}

pub fn is_object(word: &str) -> bool {
    object_members(word).is_some()
}

/// Methods of a catalogued class.
pub fn class_methods(class: &str) -> Option<&'static [MethodSignature]> {
    CLASS_METHODS
        .iter()
        .find(|entry| entry.class == class)
        .map(|entry| entry.methods)
}

pub fn class_method(class: &str, method: &str) -> Option<&'static MethodSignature> {
    class_methods(class)?.iter().find(|m| m.name == method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_math_members_in_catalog_order() {
        assert_eq!(
            object_members("Math"),
            Some(&["abs", "ceil", "floor", "round", "max", "min", "pow", "sqrt", "random"][..])
        );
    }

    #[test]
    fn test_member_lists_have_no_duplicates() {
        for entry in OBJECT_MEMBERS {
            let unique: HashSet<_> = entry.members.iter().collect();
            assert_eq!(unique.len(), entry.members.len(), "duplicate member on {}", entry.object);
        }
    }

    #[test]
    fn test_class_registry_disjoint_from_objects() {
        for entry in CLASS_METHODS {
            assert!(object_members(entry.class).is_none(), "{} is in both registries", entry.class);
        }
    }

    #[test]
    fn test_class_method_lookup() {
        let method = class_method("UTSString", "split").map(|m| m.signature);
        assert_eq!(method, Some("(separator: string): string[]"));
        assert!(class_method("UTSString", "nope").is_none());
        assert!(class_methods("Math").is_none());
    }
}
