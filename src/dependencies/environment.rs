//! The host package environment and the confirmation gate in front of it.

use crate::core::{Error, Result};
use crate::python::PythonInterpreter;
use colored::*;
use std::collections::BTreeSet;
use std::io::IsTerminal;

const FIND_SPEC: &str =
    "import importlib.util, sys; sys.exit(0 if importlib.util.find_spec(sys.argv[1]) else 1)";

/// Query and mutate the set of installed packages.
pub trait PackageEnvironment {
    /// Whether `module` can be imported right now.
    fn is_installed(&self, module: &str) -> bool;

    /// Install one distribution.
    fn install(&self, distribution: &str) -> Result<()>;
}

/// pip, driven through the local interpreter (`python -m pip install ...`).
#[derive(Debug, Clone)]
pub struct PipEnvironment {
    interpreter: Option<PythonInterpreter>,
}

impl PipEnvironment {
    pub fn new(interpreter: Option<PythonInterpreter>) -> Self {
        Self { interpreter }
    }
}

impl PackageEnvironment for PipEnvironment {
    fn is_installed(&self, module: &str) -> bool {
        let Some(interpreter) = &self.interpreter else {
            return false;
        };
        match interpreter.run(&["-c", FIND_SPEC, module], None, None) {
            Ok(output) => output.success(),
            Err(e) => {
                log::debug!("Could not query {}: {}", module, e);
                false
            }
        }
    }

    fn install(&self, distribution: &str) -> Result<()> {
        let interpreter = self
            .interpreter
            .as_ref()
            .ok_or_else(|| Error::dependency("no Python interpreter available to run pip"))?;
        let output = interpreter.run(&["-m", "pip", "install", distribution], None, None)?;
        if output.success() {
            Ok(())
        } else {
            let detail = output
                .stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("pip reported no error output")
                .trim()
                .to_string();
            Err(Error::dependency(format!(
                "pip install {} exited with {}: {}",
                distribution,
                output
                    .status
                    .map_or_else(|| "a signal".to_string(), |c| format!("status {}", c)),
                detail
            )))
        }
    }
}

/// Asks whether the missing packages may be installed.
pub trait ConfirmPrompt {
    fn confirm_install(&self, missing: &BTreeSet<String>) -> bool;
}

/// Interactive yes/no on the terminal; defaults to no.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl ConfirmPrompt for TerminalPrompt {
    fn confirm_install(&self, missing: &BTreeSet<String>) -> bool {
        eprintln!();
        eprintln!("{}", "Additional dependencies required:".yellow());
        for pkg in missing {
            eprintln!("  - {}", pkg);
        }

        if !std::io::stdin().is_terminal() {
            log::warn!("stdin is not a terminal; not installing packages without confirmation.");
            return false;
        }

        dialoguer::Confirm::new()
            .with_prompt("Do you want to install these packages?")
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                log::warn!("Confirmation prompt failed: {}", e);
                false
            })
    }
}

/// Confirmation given up front on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl ConfirmPrompt for AssumeYes {
    fn confirm_install(&self, missing: &BTreeSet<String>) -> bool {
        log::info!(
            "Installing {} missing package(s) without prompting.",
            missing.len()
        );
        true
    }
}

/// Non-interactive runs never touch the environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decline;

impl ConfirmPrompt for Decline {
    fn confirm_install(&self, _missing: &BTreeSet<String>) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pip_without_interpreter() {
        let env = PipEnvironment::new(None);
        assert!(!env.is_installed("requests"));
        assert!(matches!(env.install("requests"), Err(Error::Dependency(_))));
    }

    #[test]
    fn test_fixed_prompts() {
        let missing: BTreeSet<String> = ["requests".to_string()].into_iter().collect();
        assert!(AssumeYes.confirm_install(&missing));
        assert!(!Decline.confirm_install(&missing));
    }
}
