use crate::cli::args::Cli;
use crate::cli::config_builder::RunSettings;
use crate::config::{load_config, load_config_from, RefactorConfig};
use crate::core::{AnalysisMode, SourceUnit};
use crate::dependencies::{
    AssumeYes, BuiltinAllowlist, ConfirmPrompt, DependencyResolver, PipEnvironment, TerminalPrompt,
};
use crate::gateway::{credential_from_env, ModelGateway};
use crate::io::write_report;
use crate::orchestrator::{AnalysisOrchestrator, RunOutcome};
use crate::progress::{ProgressConfig, ProgressManager};
use crate::python::PythonInterpreter;
use crate::validation::SourceValidator;
use anyhow::{Context, Result};
use colored::*;
use std::process::ExitCode;
use std::time::Duration;

/// Run one analysis from parsed arguments.
///
/// Errors returned here happen before the source is read (conflicting mode
/// flags, unsupported provider, unreadable input) and produce no report.
/// Failures after that point are recorded in the report and mapped to exit
/// code 1.
pub fn handle_refactor_command(cli: Cli) -> Result<ExitCode> {
    let mode = AnalysisMode::from_flags(cli.basic, cli.expert)?;

    let config = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    };
    let settings = RunSettings::resolve(&cli, mode, &config)?;
    settings.formatting.apply();

    let source = SourceUnit::read(&settings.source)
        .with_context(|| format!("Failed to read input file {}", settings.source.display()))?;
    log::info!(
        "Analyzing {} in {} mode with {}",
        source.path().display(),
        settings.mode,
        settings.model
    );

    let orchestrator = build_orchestrator(&settings, &config)?;
    let outcome = orchestrator.run(&source, settings.mode, settings.refactor_output.as_deref());

    let report_path = write_report(&settings.report_dir, &source.stem(), &outcome)
        .context("Failed to write report")?;
    eprintln!(
        "{} {}",
        "Analysis report saved to:".green().bold(),
        report_path.display()
    );

    Ok(exit_code(&outcome))
}

fn build_orchestrator(settings: &RunSettings, config: &RefactorConfig) -> Result<AnalysisOrchestrator> {
    let interpreter = PythonInterpreter::locate(&config.python);
    match &interpreter {
        Some(python) => log::debug!("Using Python interpreter {}", python.path().display()),
        None => log::warn!("No Python interpreter found; runtime checks and package queries are disabled"),
    }

    let validator = SourceValidator::new(
        interpreter.clone(),
        Duration::from_secs(config.python.runtime_timeout_secs),
    );

    let progress = ProgressManager::new(ProgressConfig::from_env(settings.quiet));
    let gateway = ModelGateway::new(
        settings.provider.transport(&config.model)?,
        credential_from_env(&config.model),
        settings.model.clone(),
        config.retry.clone(),
    )
    .with_credential_source(config.model.api_key_env.clone())
    .with_progress(progress);

    let prompt: Box<dyn ConfirmPrompt> = if settings.assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalPrompt)
    };
    let resolver = DependencyResolver::new(
        BuiltinAllowlist::standard().with_extra(config.dependencies.extra_allowlist.iter()),
        config.dependencies.package_aliases.clone(),
        Box::new(PipEnvironment::new(interpreter)),
        prompt,
    );

    Ok(AnalysisOrchestrator::new(validator, gateway, resolver).with_panels(!settings.quiet))
}

fn exit_code(outcome: &RunOutcome) -> ExitCode {
    if outcome.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
