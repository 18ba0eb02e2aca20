use crate::python::parser::{line_column, parse_module};

/// Parse without executing; describe the first syntax error, if any.
pub fn check_syntax(source: &str) -> Option<String> {
    let err = parse_module(source).err()?;
    let offset = u32::from(err.offset) as usize;
    let (line, column) = line_column(source, offset);
    let headline = format!("{} at line {}, column {}", err.error, line, column);

    match source.lines().nth(line - 1).map(str::trim) {
        Some(text) if !text.is_empty() => Some(format!("{}: {}", headline, text)),
        _ => Some(headline),
    }
}
