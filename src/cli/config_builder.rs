//! Merge command-line flags over the configuration file.

use crate::cli::args::Cli;
use crate::config::RefactorConfig;
use crate::core::{AnalysisMode, Result};
use crate::formatting::{ColorMode, FormattingConfig};
use crate::gateway::Provider;
use std::path::PathBuf;

/// Everything a run needs, resolved from flags and configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub source: PathBuf,
    pub mode: AnalysisMode,
    pub provider: Provider,
    pub model: String,
    pub refactor_output: Option<PathBuf>,
    pub report_dir: PathBuf,
    pub assume_yes: bool,
    pub quiet: bool,
    pub formatting: FormattingConfig,
}

/// Model for `mode`: the `--llm` flag, else the configured model for the mode.
pub fn resolve_model(cli_model: Option<&str>, mode: AnalysisMode, config: &RefactorConfig) -> String {
    match cli_model {
        Some(model) if !model.trim().is_empty() => model.trim().to_string(),
        _ => match mode {
            AnalysisMode::Basic => config.model.basic_model.clone(),
            AnalysisMode::Normal | AnalysisMode::Expert => config.model.normal_model.clone(),
        },
    }
}

impl RunSettings {
    /// Resolve settings for an already-validated `mode`.
    ///
    /// Fails on an unsupported provider, before any file is read.
    pub fn resolve(cli: &Cli, mode: AnalysisMode, config: &RefactorConfig) -> Result<Self> {
        let provider = cli
            .llm_provider
            .as_deref()
            .unwrap_or(&config.model.provider)
            .parse::<Provider>()?;

        Ok(Self {
            source: cli.file.clone(),
            mode,
            provider,
            model: resolve_model(cli.llm.as_deref(), mode, config),
            refactor_output: cli.refactor_output.clone(),
            report_dir: cli.report_dir.clone().unwrap_or_else(|| PathBuf::from(".")),
            assume_yes: cli.yes,
            quiet: cli.quiet,
            formatting: FormattingConfig::from_env(Some(ColorMode::from(cli.color))),
        })
    }
}
