//! Best-effort runtime check.
//!
//! The source is executed for real by the local interpreter. Only `input()` is
//! disabled and `__name__` is not `"__main__"`; everything else the module
//! does at import time (file writes, network access, package imports) happens
//! on the host and is not rolled back.

use crate::python::PythonInterpreter;
use std::time::Duration;

const ERROR_MARKER: &str = "__coderefactor_runtime_error__";

/// Reads the source from stdin and executes it with a fresh globals mapping.
const HARNESS: &str = r#"
import builtins, sys
source = sys.stdin.read()

def _no_input(*args, **kwargs):
    raise RuntimeError("input() is not available during the runtime check")

sandbox = dict(vars(builtins))
sandbox["input"] = _no_input
scope = {"__name__": "__coderefactor_check__", "__builtins__": sandbox}

def _report(exc):
    sys.stderr.write("\n__coderefactor_runtime_error__ %s: %s\n" % (type(exc).__name__, exc))
    sys.stderr.flush()
    sys.exit(3)

try:
    exec(compile(source, "<string>", "exec"), scope)
except SystemExit as exc:
    if exc.code not in (None, 0):
        _report(exc)
except BaseException as exc:
    _report(exc)
"#;

/// Execute `source` and describe the first exception it raises, if any.
///
/// Interpreter problems and timeouts are logged and reported as no finding.
pub fn check_runtime(
    interpreter: &PythonInterpreter,
    source: &str,
    timeout: Duration,
) -> Option<String> {
    let output = match interpreter.run(&["-c", HARNESS], Some(source), Some(timeout)) {
        Ok(output) => output,
        Err(e) => {
            log::warn!("Runtime check unavailable: {}", e);
            return None;
        }
    };

    if output.timed_out {
        log::warn!(
            "Runtime check stopped after {}s; the script may be long-running or waiting on I/O.",
            timeout.as_secs()
        );
        return None;
    }

    if let Some(description) = extract_finding(&output.stderr) {
        return Some(description);
    }

    if output.success() {
        None
    } else {
        let detail = output
            .stderr
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .unwrap_or("no diagnostic output");
        Some(match output.status {
            Some(code) => format!("execution aborted with exit status {}: {}", code, detail),
            None => format!("execution was terminated by a signal: {}", detail),
        })
    }
}

fn extract_finding(stderr: &str) -> Option<String> {
    stderr
        .lines()
        .rev()
        .find_map(|line| line.strip_prefix(ERROR_MARKER))
        .map(|rest| rest.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_extract_finding_from_stderr() {
        let stderr = "some warning\n\n__coderefactor_runtime_error__ NameError: name 'x' is not defined\n";
        assert_eq!(
            extract_finding(stderr).as_deref(),
            Some("NameError: name 'x' is not defined")
        );
    }

    #[test]
    fn test_no_marker_means_no_finding() {
        assert_eq!(extract_finding("DeprecationWarning: old api\n"), None);
    }

    #[test]
    fn test_unstartable_interpreter_is_not_a_finding() {
        let interpreter = PythonInterpreter::new("/definitely/not/a/python");
        assert_eq!(
            check_runtime(&interpreter, "x = 1", Duration::from_secs(1)),
            None
        );
    }

    fn python3() -> Option<PythonInterpreter> {
        which::which("python3").ok().map(PythonInterpreter::new)
    }

    fn run_check(source: &str) -> Option<Option<String>> {
        let python = python3()?;
        Some(check_runtime(&python, source, Duration::from_secs(10)))
    }

    #[test]
    fn test_name_error_is_reported() {
        let Some(finding) = run_check("value = undefined_name + 1\n") else { return };
        assert_eq!(
            finding.as_deref(),
            Some("NameError: name 'undefined_name' is not defined")
        );
    }

    #[test]
    fn test_clean_module_has_no_finding() {
        let Some(finding) = run_check("import json\nDATA = json.dumps({'a': 1})\n") else {
            return;
        };
        assert_eq!(finding, None);
    }

    #[test]
    fn test_main_block_stays_dormant() {
        let source = indoc! {r#"
            def main():
                raise ValueError("main ran")

            if __name__ == "__main__":
                main()
        "#};
        let Some(finding) = run_check(source) else { return };
        assert_eq!(finding, None);
    }

    #[test]
    fn test_input_is_disabled() {
        let Some(finding) = run_check("name = input('Name: ')\n") else { return };
        let finding = finding.unwrap();
        assert!(finding.starts_with("RuntimeError:"), "finding: {}", finding);
        assert!(finding.contains("input()"), "finding: {}", finding);
    }

    #[test]
    fn test_nonzero_exit_is_reported() {
        let Some(finding) = run_check("import sys\nsys.exit(2)\n") else { return };
        assert_eq!(finding.as_deref(), Some("SystemExit: 2"));
    }

    #[test]
    fn test_clean_exit_has_no_finding() {
        let Some(finding) = run_check("import sys\nsys.exit(0)\n") else { return };
        assert_eq!(finding, None);
    }

    #[test]
    fn test_timeout_is_not_a_finding() {
        let Some(python) = python3() else { return };
        let started = std::time::Instant::now();
        let finding = check_runtime(
            &python,
            "import time\ntime.sleep(30)\n",
            Duration::from_secs(1),
        );
        assert_eq!(finding, None);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_spawned_process_cannot_outlast_timeout() {
        let source = indoc! {r#"
            import subprocess, sys, time
            subprocess.Popen([sys.executable, "-c", "import time; time.sleep(20)"])
            time.sleep(30)
        "#};
        let Some(python) = python3() else { return };
        let started = std::time::Instant::now();
        assert_eq!(check_runtime(&python, source, Duration::from_secs(2)), None);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_harness_uses_marker() {
        assert!(HARNESS.contains(ERROR_MARKER));
    }
}
