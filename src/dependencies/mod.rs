//! Third-party requirements of generated code.
//!
//! Before refactored code is written, its imports are compared against the
//! built-in allowlist and the installed packages. Whatever is left is offered
//! for installation. This is the only part of the program allowed to change
//! the host package environment, and only after confirmation.

mod allowlist;
mod environment;
mod imports;

pub use allowlist::{distribution_name, BuiltinAllowlist};
pub use environment::{
    AssumeYes, ConfirmPrompt, Decline, PackageEnvironment, PipEnvironment, TerminalPrompt,
};
pub use imports::extract_imports;

use colored::*;
use std::collections::{BTreeMap, BTreeSet};

/// How the missing packages of one candidate were dealt with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing was missing, or everything missing got installed.
    Satisfied,
    /// The user did not agree to install; the code may not run.
    Declined,
    /// An installation failed. Packages after `package` were not attempted.
    PartiallyFailed { package: String, reason: String },
}

/// Dependency state of one candidate code string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyReport {
    pub required: BTreeSet<String>,
    pub missing: BTreeSet<String>,
    pub resolution: Resolution,
}

impl DependencyReport {
    /// Whether the candidate may be written to disk.
    pub fn allows_write(&self) -> bool {
        !matches!(self.resolution, Resolution::PartiallyFailed { .. })
    }
}

/// Imports that are neither allowlisted nor already importable.
pub fn classify_missing(
    imports: &BTreeSet<String>,
    allowlist: &BuiltinAllowlist,
    environment: &dyn PackageEnvironment,
) -> BTreeSet<String> {
    imports
        .iter()
        .filter(|module| !allowlist.contains(module))
        .filter(|module| !environment.is_installed(module))
        .cloned()
        .collect()
}

pub struct DependencyResolver {
    allowlist: BuiltinAllowlist,
    aliases: BTreeMap<String, String>,
    environment: Box<dyn PackageEnvironment>,
    prompt: Box<dyn ConfirmPrompt>,
}

impl DependencyResolver {
    pub fn new(
        allowlist: BuiltinAllowlist,
        aliases: BTreeMap<String, String>,
        environment: Box<dyn PackageEnvironment>,
        prompt: Box<dyn ConfirmPrompt>,
    ) -> Self {
        Self {
            allowlist,
            aliases,
            environment,
            prompt,
        }
    }

    /// Extract, classify and reconcile the requirements of `code`.
    pub fn check_code(&self, code: &str) -> DependencyReport {
        let required = extract_imports(code);
        let missing = classify_missing(&required, &self.allowlist, self.environment.as_ref());
        let resolution = self.reconcile(&missing);
        DependencyReport {
            required,
            missing,
            resolution,
        }
    }

    /// Offer the missing packages for installation.
    ///
    /// Installs run one at a time in sorted order and stop at the first
    /// failure: later packages are deliberately not attempted, so the failing
    /// package is always the last one tried.
    pub fn reconcile(&self, missing: &BTreeSet<String>) -> Resolution {
        if missing.is_empty() {
            return Resolution::Satisfied;
        }
        if !self.prompt.confirm_install(missing) {
            return Resolution::Declined;
        }

        eprintln!("{}", "Installing packages...".bold());
        for module in missing {
            let distribution = distribution_name(module, &self.aliases);
            match self.environment.install(distribution) {
                Ok(()) => {
                    eprintln!("{} {}", "Successfully installed".green(), distribution);
                }
                Err(e) => {
                    eprintln!("{} {}: {}", "Failed to install".red(), distribution, e);
                    return Resolution::PartiallyFailed {
                        package: distribution.to_string(),
                        reason: e.to_string(),
                    };
                }
            }
        }
        Resolution::Satisfied
    }
}
