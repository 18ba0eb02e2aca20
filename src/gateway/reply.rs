//! Structured-reply contract.

use crate::core::{CallKind, Error, ModelReply, Result};
use serde_json::{Map, Value};

/// Validate a raw model reply against the contract of `kind`.
///
/// The reply must be one JSON object (optionally wrapped in a single code
/// fence) carrying every required field as a non-empty string. Returned code
/// has its own fences stripped.
pub fn parse_reply(kind: CallKind, raw: &str) -> Result<ModelReply> {
    let body = strip_code_fences(raw);
    let value: Value = serde_json::from_str(&body)
        .map_err(|e| Error::contract(format!("reply is not valid JSON: {}", e)))?;
    let object = value
        .as_object()
        .ok_or_else(|| Error::contract("reply is not a JSON object"))?;

    Ok(match kind {
        CallKind::Analysis => ModelReply::Analysis {
            analysis: required_text(object, "analysis")?,
        },
        CallKind::Refactor => ModelReply::Refactor {
            code: required_code(object)?,
        },
        CallKind::Combined => ModelReply::Combined {
            analysis: required_text(object, "analysis")?,
            code: required_code(object)?,
        },
    })
}

fn required_text(object: &Map<String, Value>, field: &str) -> Result<String> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::contract(format!("reply has no '{}' field", field)))
}

fn required_code(object: &Map<String, Value>) -> Result<String> {
    let code = strip_code_fences(&required_text(object, "code")?);
    if code.is_empty() {
        return Err(Error::contract("'code' field holds only fence markup"));
    }
    Ok(code)
}

/// Remove a code fence wrapping the whole text (```` ```python ... ``` ````).
///
/// Text without a leading fence is only trimmed.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    // The info string (python, py, json, ...) runs to the end of the fence line
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_analysis_reply() {
        let reply = parse_reply(CallKind::Analysis, r#"{"analysis": "Looks fine."}"#).unwrap();
        assert_eq!(
            reply,
            ModelReply::Analysis {
                analysis: "Looks fine.".into()
            }
        );
    }

    #[test]
    fn test_combined_reply_requires_both_fields() {
        let err = parse_reply(CallKind::Combined, r#"{"analysis": "ok"}"#).unwrap_err();
        assert!(matches!(err, Error::Contract(ref m) if m.contains("'code'")));
    }

    #[test]
    fn test_empty_field_is_a_violation() {
        let err = parse_reply(CallKind::Analysis, r#"{"analysis": "  "}"#).unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_non_object_and_non_json_are_violations() {
        assert!(matches!(
            parse_reply(CallKind::Analysis, r#"["analysis"]"#),
            Err(Error::Contract(_))
        ));
        assert!(matches!(
            parse_reply(CallKind::Analysis, "Sure! Here is my analysis."),
            Err(Error::Contract(_))
        ));
    }

    #[test]
    fn test_fenced_json_reply_is_accepted() {
        let raw = "```json\n{\"code\": \"x = 1\"}\n```";
        assert_eq!(
            parse_reply(CallKind::Refactor, raw).unwrap(),
            ModelReply::Refactor { code: "x = 1".into() }
        );
    }

    #[test]
    fn test_code_fences_are_stripped() {
        let raw = r#"{"analysis": "a", "code": "```python\nimport time\n\ntime.sleep(2)\n```"}"#;
        let reply = parse_reply(CallKind::Combined, raw).unwrap();
        assert_eq!(reply.code(), Some("import time\n\ntime.sleep(2)"));
    }

    #[test]
    fn test_strip_code_fences_variants() {
        assert_eq!(strip_code_fences("x = 1"), "x = 1");
        assert_eq!(strip_code_fences("```\nx = 1\n```"), "x = 1");
        assert_eq!(strip_code_fences("```py\nx = 1\n```\n"), "x = 1");
        let nested = indoc! {"
            ```python
            def f():
                return 1
            ```
        "};
        assert_eq!(strip_code_fences(nested), "def f():\n    return 1");
    }
}
