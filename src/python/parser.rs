//! Python 3 front end built on `rustpython_parser`.

use rustpython_parser::{ast, Mode, ParseError};

/// Parse a whole module with the Python 3 grammar.
pub fn parse_module(source: &str) -> Result<ast::Mod, ParseError> {
    rustpython_parser::parse(source, Mode::Module, "<module>")
}

/// 1-based line and column of a byte offset into `source`.
///
/// Offsets at the very end (unexpected EOF) are pulled back onto the last
/// non-blank line so the position points at the unfinished construct.
pub fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.trim_end().len());
    let prefix = source.get(..offset).unwrap_or(source);
    let line = prefix.matches('\n').count() + 1;
    let line_start = prefix.rfind('\n').map_or(0, |i| i + 1);
    let column = prefix[line_start..].chars().count() + 1;
    (line, column)
}

/// Every statement of the module, nested bodies included, in source order.
///
/// Walks with an explicit stack so deeply nested code cannot exhaust the
/// thread stack.
pub fn all_statements(module: &ast::Mod) -> Vec<&ast::Stmt> {
    let ast::Mod::Module(module) = module else {
        return Vec::new();
    };

    let mut found = Vec::new();
    let mut pending: Vec<&ast::Stmt> = module.body.iter().rev().collect();
    while let Some(stmt) = pending.pop() {
        found.push(stmt);
        let mut children = nested_bodies(stmt);
        children.reverse();
        pending.extend(children);
    }
    found
}

fn nested_bodies(stmt: &ast::Stmt) -> Vec<&ast::Stmt> {
    match stmt {
        ast::Stmt::FunctionDef(f) => f.body.iter().collect(),
        ast::Stmt::AsyncFunctionDef(f) => f.body.iter().collect(),
        ast::Stmt::ClassDef(c) => c.body.iter().collect(),
        ast::Stmt::For(s) => s.body.iter().chain(&s.orelse).collect(),
        ast::Stmt::AsyncFor(s) => s.body.iter().chain(&s.orelse).collect(),
        ast::Stmt::While(s) => s.body.iter().chain(&s.orelse).collect(),
        ast::Stmt::If(s) => s.body.iter().chain(&s.orelse).collect(),
        ast::Stmt::With(s) => s.body.iter().collect(),
        ast::Stmt::AsyncWith(s) => s.body.iter().collect(),
        ast::Stmt::Match(s) => s.cases.iter().flat_map(|case| &case.body).collect(),
        ast::Stmt::Try(s) => try_bodies(&s.body, &s.handlers, &s.orelse, &s.finalbody),
        ast::Stmt::TryStar(s) => try_bodies(&s.body, &s.handlers, &s.orelse, &s.finalbody),
        _ => Vec::new(),
    }
}

fn try_bodies<'a>(
    body: &'a [ast::Stmt],
    handlers: &'a [ast::ExceptHandler],
    orelse: &'a [ast::Stmt],
    finalbody: &'a [ast::Stmt],
) -> Vec<&'a ast::Stmt> {
    let handler_bodies = handlers.iter().flat_map(|handler| {
        let ast::ExceptHandler::ExceptHandler(handler) = handler;
        &handler.body
    });
    body.iter()
        .chain(handler_bodies)
        .chain(orelse)
        .chain(finalbody)
        .collect()
}
