//! Call signatures for free functions and qualified object members

/// Signature of a built-in callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionSignature {
    /// Bare (`parseInt`) or qualified (`Math.max`) name.
    pub name: &'static str,
    pub parameters: &'static [&'static str],
    pub return_type: &'static str,
    pub description: &'static str,
}

impl FunctionSignature {
    /// `name(p1, p2): ret`
    pub fn label(&self) -> String {
        format!("{}({}): {}", self.name, self.parameters.join(", "), self.return_type)
    }
}

macro_rules! signature {
    ($name:literal, [$($param:literal),*], $ret:literal, $description:literal) => {
        FunctionSignature {
            name: $name,
            parameters: &[$($param),*],
            return_type: $ret,
            description: $description,
        }
    };
}

pub const FUNCTION_SIGNATURES: &[FunctionSignature] = &[
    signature!("parseInt", ["string: string", "radix?: number"], "number", "Parses a string and returns an integer."),
    signature!("parseFloat", ["string: string"], "number", "Parses a string and returns a floating point number."),
    signature!("isNaN", ["value: number"], "boolean", "Returns true if the value is NaN."),
    signature!("isFinite", ["value: number"], "boolean", "Returns true if the value is a finite number."),
    signature!("encodeURI", ["uri: string"], "string", "Encodes a complete URI."),
    signature!("decodeURI", ["encodedURI: string"], "string", "Decodes a complete URI."),
    signature!("encodeURIComponent", ["component: string"], "string", "Encodes a URI component."),
    signature!("decodeURIComponent", ["encodedComponent: string"], "string", "Decodes a URI component."),
    signature!("console.log", ["...data: any[]"], "void", "Writes a message to the console."),
    signature!("console.error", ["...data: any[]"], "void", "Writes an error message to the console."),
    signature!("console.warn", ["...data: any[]"], "void", "Writes a warning message to the console."),
    signature!("console.info", ["...data: any[]"], "void", "Writes an informational message to the console."),
    signature!("console.debug", ["...data: any[]"], "void", "Writes a debug message to the console."),
    signature!("Array.isArray", ["value: any"], "boolean", "Returns true if the value is an array."),
    signature!("Array.from", ["iterable: any"], "any[]", "Creates an array from an iterable or array-like value."),
    signature!("Array.of", ["...items: any[]"], "any[]", "Creates an array from its arguments."),
    signature!("Object.keys", ["o: object"], "string[]", "Returns the names of the enumerable own properties."),
    signature!("Object.values", ["o: object"], "any[]", "Returns the values of the enumerable own properties."),
    signature!("Object.entries", ["o: object"], "[string, any][]", "Returns key/value pairs of the enumerable own properties."),
    signature!("Object.assign", ["target: object", "...sources: any[]"], "any", "Copies own properties from sources into target."),
    signature!("JSON.stringify", ["value: any", "replacer?: any", "space?: string | number"], "string", "Converts a value to JSON text."),
    signature!("JSON.parse", ["text: string", "reviver?: any"], "any", "Parses JSON text into a value."),
    signature!("Math.abs", ["x: number"], "number", "Returns the absolute value."),
    signature!("Math.ceil", ["x: number"], "number", "Rounds up to the nearest integer."),
    signature!("Math.floor", ["x: number"], "number", "Rounds down to the nearest integer."),
    signature!("Math.round", ["x: number"], "number", "Rounds to the nearest integer."),
    signature!("Math.max", ["...values: number[]"], "number", "Returns the largest of the given numbers."),
    signature!("Math.min", ["...values: number[]"], "number", "Returns the smallest of the given numbers."),
    signature!("Math.pow", ["x: number", "y: number"], "number", "Returns x raised to the power y."),
    signature!("Math.sqrt", ["x: number"], "number", "Returns the square root."),
    signature!("Math.random", [], "number", "Returns a pseudo-random number in [0, 1)."),
    signature!("Number.isInteger", ["value: any"], "boolean", "Returns true if the value is an integer."),
    signature!("Date.now", [], "number", "Returns the current time in milliseconds since the epoch."),
    signature!("Promise.resolve", ["value: any"], "Promise<any>", "Returns a promise resolved with the value."),
    signature!("Promise.reject", ["reason?: any"], "Promise<never>", "Returns a promise rejected with the reason."),
    signature!("Promise.all", ["values: any[]"], "Promise<any[]>", "Resolves when all promises resolve."),
    signature!("Promise.race", ["values: any[]"], "Promise<any>", "Settles with the first promise to settle."),
    signature!("Promise.allSettled", ["values: any[]"], "Promise<any[]>", "Resolves when all promises settle."),
];

pub fn function_signature(name: &str) -> Option<&'static FunctionSignature> {
    FUNCTION_SIGNATURES.iter().find(|sig| sig.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_formatting() {
        let sig = function_signature("Math.max").map(|s| s.label());
        assert_eq!(sig.as_deref(), Some("Math.max(...values: number[]): number"));
        let random = function_signature("Math.random").map(|s| s.label());
        assert_eq!(random.as_deref(), Some("Math.random(): number"));
    }

    #[test]
    fn test_qualified_and_bare_are_distinct() {
        assert!(function_signature("parseInt").is_some());
        assert!(function_signature("max").is_none());
    }
}
