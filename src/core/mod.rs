pub mod errors;

pub use errors::{Error, Result};

use std::fmt;
use std::path::{Path, PathBuf};

/// The file under analysis. Read once, never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    path: PathBuf,
    text: String,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Read the source from disk.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::input(path, e))?;
        Ok(Self::new(path, text))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// File name without directories or extension, used to name the report.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "source".to_string())
    }
}

/// Findings from the syntax and runtime checks.
///
/// Advisory only: a finding never stops the run, it is forwarded to the model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub syntax_error: Option<String>,
    pub runtime_error: Option<String>,
}

impl ValidationResult {
    pub fn is_clean(&self) -> bool {
        self.syntax_error.is_none() && self.runtime_error.is_none()
    }

    /// Render the findings as the context block injected into prompts.
    pub fn advisory_context(&self) -> String {
        let mut context = String::new();
        if let Some(err) = &self.syntax_error {
            context.push_str(&format!("\nSyntax Error found: {}", err));
        }
        if let Some(err) = &self.runtime_error {
            context.push_str(&format!("\nRuntime Error found: {}", err));
        }
        context
    }
}

/// Analysis depth selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisMode {
    Normal,
    Basic,
    Expert,
}

impl AnalysisMode {
    pub const DEFAULT_MODEL: &'static str = "gpt-5";
    pub const DEFAULT_BASIC_MODEL: &'static str = "gpt-5-mini";

    /// Resolve the mode from the two mutually exclusive switches.
    pub fn from_flags(basic: bool, expert: bool) -> Result<Self> {
        match (basic, expert) {
            (true, true) => Err(Error::configuration(
                "--basic and --expert cannot be used together",
            )),
            (true, false) => Ok(Self::Basic),
            (false, true) => Ok(Self::Expert),
            (false, false) => Ok(Self::Normal),
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Self::Basic => Self::DEFAULT_BASIC_MODEL,
            Self::Normal | Self::Expert => Self::DEFAULT_MODEL,
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Basic => write!(f, "basic"),
            Self::Expert => write!(f, "expert"),
        }
    }
}

/// What a single model call is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// Analysis text only
    Analysis,
    /// Refactored code only, informed by a prior analysis
    Refactor,
    /// Analysis and refactored code in one reply
    Combined,
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Analysis => write!(f, "analysis call"),
            Self::Refactor => write!(f, "refactor call"),
            Self::Combined => write!(f, "combined analysis and refactor call"),
        }
    }
}

/// One request to the model service. Built fresh for every call.
#[derive(Debug, Clone)]
pub struct ModelRequest<'a> {
    pub source: &'a SourceUnit,
    pub validation: &'a ValidationResult,
    pub mode: AnalysisMode,
    pub kind: CallKind,
    /// Analysis text from the first call of a two-call flow.
    pub prior_analysis: Option<String>,
}

impl<'a> ModelRequest<'a> {
    pub fn analysis(
        source: &'a SourceUnit,
        validation: &'a ValidationResult,
        mode: AnalysisMode,
    ) -> Self {
        Self {
            source,
            validation,
            mode,
            kind: CallKind::Analysis,
            prior_analysis: None,
        }
    }

    pub fn combined(source: &'a SourceUnit, validation: &'a ValidationResult) -> Self {
        Self {
            source,
            validation,
            mode: AnalysisMode::Basic,
            kind: CallKind::Combined,
            prior_analysis: None,
        }
    }

    pub fn refactor(
        source: &'a SourceUnit,
        validation: &'a ValidationResult,
        mode: AnalysisMode,
        prior_analysis: impl Into<String>,
    ) -> Self {
        Self {
            source,
            validation,
            mode,
            kind: CallKind::Refactor,
            prior_analysis: Some(prior_analysis.into()),
        }
    }
}

/// A reply that satisfied the contract of its call kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelReply {
    Analysis { analysis: String },
    Refactor { code: String },
    Combined { analysis: String, code: String },
}

impl ModelReply {
    pub fn analysis(&self) -> Option<&str> {
        match self {
            Self::Analysis { analysis } | Self::Combined { analysis, .. } => Some(analysis),
            Self::Refactor { .. } => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Refactor { code } | Self::Combined { code, .. } => Some(code),
            Self::Analysis { .. } => None,
        }
    }

    /// Split into `(analysis, code)`.
    pub fn into_parts(self) -> (Option<String>, Option<String>) {
        match self {
            Self::Analysis { analysis } => (Some(analysis), None),
            Self::Refactor { code } => (None, Some(code)),
            Self::Combined { analysis, code } => (Some(analysis), Some(code)),
        }
    }
}
