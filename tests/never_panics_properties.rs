//! Property-based tests: source inspection never panics.
//!
//! - `check_syntax` returns a value for arbitrary text
//! - `extract_imports` returns a set for arbitrary text
//! - Valid generated modules have no syntax finding

use coderefactor::{check_syntax, extract_imports};
use proptest::prelude::*;

/// Python keywords to avoid
const PYTHON_KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield", "None",
    "True", "False", "match", "case", "type", "print", "exec",
];

fn python_identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}".prop_filter("not a keyword", |s| !PYTHON_KEYWORDS.contains(&s.as_str()))
}

proptest! {
    #[test]
    fn prop_check_syntax_never_panics(source in "\\PC{0,200}") {
        let _ = check_syntax(&source);
    }

    #[test]
    fn prop_extract_imports_never_panics(source in "(import |from |\\PC){0,60}") {
        let _ = extract_imports(&source);
    }

    #[test]
    fn prop_generated_module_is_clean_and_imports_found(
        module in python_identifier(),
        func in python_identifier(),
    ) {
        let source = format!("import {module}\n\ndef {func}():\n    return {module}\n");
        prop_assert_eq!(check_syntax(&source), None);
        let imports = extract_imports(&source);
        prop_assert!(imports.contains(&module));
        prop_assert_eq!(imports.len(), 1);
    }

    #[test]
    fn prop_unclosed_call_is_reported(func in python_identifier()) {
        let source = format!("{func}(1, 2\n");
        prop_assert!(check_syntax(&source).is_some());
    }
}
