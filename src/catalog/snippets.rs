//! Structural code templates in LSP snippet syntax

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snippet {
    pub label: &'static str,
    pub detail: &'static str,
    /// Body with `${n:placeholder}` tab stops.
    pub template: &'static str,
}

pub const SNIPPETS: &[Snippet] = &[
    Snippet {
        label: "let",
        detail: "Variable declaration",
        template: "let ${1:variableName}: ${2:string} = ${3:\"value\"};",
    },
    Snippet {
        label: "const",
        detail: "Constant declaration",
        template: "const ${1:constantName}: ${2:string} = ${3:\"value\"};",
    },
    Snippet {
        label: "function",
        detail: "Function declaration",
        template: "function ${1:functionName}(${2:params}): ${3:void} {\n\t${4:// function body}\n}",
    },
    Snippet {
        label: "class",
        detail: "Class declaration",
        template: "class ${1:ClassName} {\n\tconstructor(${2:params}) {\n\t\t${3:// constructor body}\n\t}\n}",
    },
    Snippet {
        label: "interface",
        detail: "Interface declaration",
        template: "interface ${1:InterfaceName} {\n\t${2:property}: ${3:string};\n}",
    },
    Snippet {
        label: "if",
        detail: "Conditional statement",
        template: "if (${1:condition}) {\n\t${2:// code}\n}",
    },
    Snippet {
        label: "for",
        detail: "Counting loop",
        template: "for (let ${1:i} = 0; ${1:i} < ${2:length}; ${1:i}++) {\n\t${3:// loop body}\n}",
    },
    Snippet {
        label: "try",
        detail: "Try/catch block",
        template: "try {\n\t${1:// code}\n} catch (${2:error}) {\n\t${3:// error handling}\n}",
    },
    Snippet {
        label: "async",
        detail: "Async function declaration",
        template: "async function ${1:functionName}(${2:params}): Promise<${3:void}> {\n\t${4:// function body}\n}",
    },
    Snippet {
        label: "await",
        detail: "Await expression",
        template: "const ${1:result} = await ${2:promise};",
    },
    Snippet {
        label: "generic",
        detail: "Generic function declaration",
        template: "function ${1:functionName}<${2:T}>(${3:value}: ${2:T}): ${2:T} {\n\t${4:return value;}\n}",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_snippet_has_a_first_tab_stop() {
        for snippet in SNIPPETS {
            assert!(snippet.template.contains("${1:"), "{} has no first placeholder", snippet.label);
        }
    }

    #[test]
    fn test_labels_unique() {
        let mut labels: Vec<_> = SNIPPETS.iter().map(|s| s.label).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), SNIPPETS.len());
    }
}
