//! Static and dynamic checks on the input source.
//!
//! Both checks report findings as plain descriptions and never fail past
//! their boundary: a parser or interpreter problem becomes a description (or
//! a logged warning), not an error for the caller.

mod runtime;
mod syntax;

pub use runtime::check_runtime;
pub use syntax::check_syntax;

use crate::core::{SourceUnit, ValidationResult};
use crate::python::PythonInterpreter;
use std::time::Duration;

/// Runs the syntax check and, when it passes, the runtime check.
#[derive(Debug, Clone)]
pub struct SourceValidator {
    interpreter: Option<PythonInterpreter>,
    runtime_timeout: Duration,
}

impl SourceValidator {
    pub fn new(interpreter: Option<PythonInterpreter>, runtime_timeout: Duration) -> Self {
        Self {
            interpreter,
            runtime_timeout,
        }
    }

    /// Validator that never executes the source.
    pub fn syntax_only() -> Self {
        Self::new(None, Duration::ZERO)
    }

    pub fn validate(&self, source: &SourceUnit) -> ValidationResult {
        let syntax_error = check_syntax(source.text());
        if let Some(err) = &syntax_error {
            log::error!("Syntax error detected: {}", err);
            return ValidationResult {
                syntax_error,
                runtime_error: None,
            };
        }
        log::info!("Syntax check passed: no syntax errors detected.");

        let runtime_error = match &self.interpreter {
            Some(interpreter) => check_runtime(interpreter, source.text(), self.runtime_timeout),
            None => {
                log::warn!("No Python interpreter available; skipping the runtime check.");
                None
            }
        };
        match &runtime_error {
            Some(err) => log::error!("Runtime error detected: {}", err),
            None if self.interpreter.is_some() => {
                log::info!("Runtime check passed: no runtime errors detected during execution.")
            }
            None => {}
        }

        ValidationResult {
            syntax_error: None,
            runtime_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_failure_skips_runtime_check() {
        let validator = SourceValidator::new(
            Some(PythonInterpreter::new("/definitely/not/a/python")),
            Duration::from_secs(1),
        );
        let unit = SourceUnit::new("broken.py", "def f(:\n    pass\n");
        let result = validator.validate(&unit);
        assert!(result.syntax_error.is_some());
        assert!(result.runtime_error.is_none());
    }

    #[test]
    fn test_validate_reports_runtime_error_with_interpreter() {
        let Ok(path) = which::which("python3") else { return };
        let validator = SourceValidator::new(
            Some(PythonInterpreter::new(path)),
            Duration::from_secs(10),
        );
        let unit = SourceUnit::new("names.py", "total = price * 2\n");
        let result = validator.validate(&unit);
        assert_eq!(result.syntax_error, None);
        assert_eq!(
            result.runtime_error.as_deref(),
            Some("NameError: name 'price' is not defined")
        );
    }

    #[test]
    fn test_validate_python2_source_stops_at_syntax() {
        let Ok(path) = which::which("python3") else { return };
        let validator = SourceValidator::new(
            Some(PythonInterpreter::new(path)),
            Duration::from_secs(10),
        );
        let unit = SourceUnit::new("legacy.py", "print 'hello'\n");
        let result = validator.validate(&unit);
        assert!(result.syntax_error.is_some());
        assert_eq!(result.runtime_error, None);
    }

    #[test]
    fn test_syntax_only_validator() {
        let unit = SourceUnit::new("ok.py", "x = 1\n");
        let result = SourceValidator::syntax_only().validate(&unit);
        assert!(result.is_clean());
    }
}
