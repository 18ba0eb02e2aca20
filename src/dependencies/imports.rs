use crate::python::parser::{all_statements, parse_module};
use rustpython_parser::ast;
use std::collections::BTreeSet;

/// Root module name of every absolute import in `source`.
///
/// Imports nested in functions or conditionals count too. Relative imports
/// and `__future__` imports are skipped. A source that does not parse yields
/// an empty set.
pub fn extract_imports(source: &str) -> BTreeSet<String> {
    let module = match parse_module(source) {
        Ok(module) => module,
        Err(e) => {
            log::debug!("Import extraction skipped: {}", e);
            return BTreeSet::new();
        }
    };

    let mut imports = BTreeSet::new();
    for stmt in all_statements(&module) {
        match stmt {
            ast::Stmt::Import(import) => {
                imports.extend(
                    import
                        .names
                        .iter()
                        .filter_map(|alias| root_segment(alias.name.as_str())),
                );
            }
            ast::Stmt::ImportFrom(import_from) => {
                let level = import_from.level.map(|l| l.to_usize()).unwrap_or(0);
                if level > 0 {
                    continue;
                }
                if let Some(module) = &import_from.module {
                    if module.as_str() != "__future__" {
                        imports.extend(root_segment(module.as_str()));
                    }
                }
            }
            _ => {}
        }
    }
    imports
}

fn root_segment(dotted: &str) -> Option<String> {
    dotted
        .split('.')
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
