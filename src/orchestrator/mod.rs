//! The run state machine.
//!
//! `Validating → ModeDispatch → {NormalFlow | BasicFlow | ExpertFlow} →
//! DependencyGate → Persisting → Done`. Validation findings never stop a run.
//! A model call that exhausts its retries aborts the remaining flow; the
//! failure is recorded in the [`RunOutcome`] so a report is still produced.

mod outcome;

pub use outcome::RunOutcome;

use crate::core::{AnalysisMode, ModelRequest, Result, SourceUnit, ValidationResult};
use crate::dependencies::{DependencyResolver, Resolution};
use crate::formatting::render_panel;
use crate::gateway::ModelGateway;
use crate::observability::{set_current_call, set_current_file, set_stage_persistent, RunStage};
use crate::validation::SourceValidator;
use colored::*;
use std::path::Path;

pub struct AnalysisOrchestrator {
    validator: SourceValidator,
    gateway: ModelGateway,
    resolver: DependencyResolver,
    show_panels: bool,
}

impl AnalysisOrchestrator {
    pub fn new(validator: SourceValidator, gateway: ModelGateway, resolver: DependencyResolver) -> Self {
        Self {
            validator,
            gateway,
            resolver,
            show_panels: true,
        }
    }

    /// Print analysis panels to stdout (on by default).
    pub fn with_panels(mut self, show: bool) -> Self {
        self.show_panels = show;
        self
    }

    /// Run the whole flow for one source file.
    ///
    /// Always returns an outcome; a fatal model-call failure is recorded in it
    /// rather than returned.
    pub fn run(&self, source: &SourceUnit, mode: AnalysisMode, output: Option<&Path>) -> RunOutcome {
        let outcome = RunOutcome::start(source.path(), mode, self.gateway.model());
        let _file = set_current_file(source.path());

        if let Err(e) = self.drive(source, mode, output, &outcome) {
            log::error!("{}", e);
            outcome.record_failure(e.to_string());
        }

        set_stage_persistent(RunStage::Done);
        outcome.finish();
        outcome
    }

    fn drive(
        &self,
        source: &SourceUnit,
        mode: AnalysisMode,
        output: Option<&Path>,
        outcome: &RunOutcome,
    ) -> Result<()> {
        set_stage_persistent(RunStage::Validating);
        let validation = self.validator.validate(source);

        set_stage_persistent(RunStage::ModeDispatch);
        let candidate = match mode {
            AnalysisMode::Basic => {
                set_stage_persistent(RunStage::BasicFlow);
                self.basic_flow(source, &validation, output.is_some(), outcome)?
            }
            AnalysisMode::Normal | AnalysisMode::Expert => {
                set_stage_persistent(if mode == AnalysisMode::Expert {
                    RunStage::ExpertFlow
                } else {
                    RunStage::NormalFlow
                });
                self.two_call_flow(source, &validation, mode, output.is_some(), outcome)?
            }
        };

        match (candidate, output) {
            (Some(code), Some(path)) => self.gate_and_persist(&code, path, outcome),
            _ => Ok(()),
        }
    }

    /// One combined call when code is wanted, otherwise analysis only.
    fn basic_flow(
        &self,
        source: &SourceUnit,
        validation: &ValidationResult,
        wants_code: bool,
        outcome: &RunOutcome,
    ) -> Result<Option<String>> {
        let request = if wants_code {
            ModelRequest::combined(source, validation)
        } else {
            ModelRequest::analysis(source, validation, AnalysisMode::Basic)
        };
        let (analysis, code) = self.call(&request)?;
        if let Some(analysis) = analysis {
            self.show_analysis("Basic Analysis Report", &analysis);
            outcome.record_analysis(analysis);
        }
        Ok(code)
    }

    /// Analysis call, then a refactor call fed with that analysis when code is wanted.
    fn two_call_flow(
        &self,
        source: &SourceUnit,
        validation: &ValidationResult,
        mode: AnalysisMode,
        wants_code: bool,
        outcome: &RunOutcome,
    ) -> Result<Option<String>> {
        let (analysis, _) = self.call(&ModelRequest::analysis(source, validation, mode))?;
        let analysis = analysis.unwrap_or_default();
        self.show_analysis("Semantic Analysis Report", &analysis);
        outcome.record_analysis(analysis.clone());

        if !wants_code {
            return Ok(None);
        }
        let (_, code) = self.call(&ModelRequest::refactor(source, validation, mode, analysis))?;
        Ok(code)
    }

    fn call(&self, request: &ModelRequest<'_>) -> Result<(Option<String>, Option<String>)> {
        let _call = set_current_call(request.kind.to_string());
        Ok(self.gateway.invoke(request)?.into_parts())
    }

    fn gate_and_persist(&self, code: &str, path: &Path, outcome: &RunOutcome) -> Result<()> {
        set_stage_persistent(RunStage::DependencyGate);
        let report = self.resolver.check_code(code);
        log::debug!(
            "Refactored code imports {} module(s), {} missing",
            report.required.len(),
            report.missing.len()
        );

        match &report.resolution {
            Resolution::Satisfied => {}
            Resolution::Declined => {
                let warning = format!(
                    "Missing packages were not installed ({}); the refactored code may not run",
                    join(&report.missing)
                );
                log::warn!("{}", warning);
                outcome.push_warning(warning);
            }
            Resolution::PartiallyFailed { package, reason } => {
                let warning = format!(
                    "Installing {} failed ({}); refactored code was not written to {}",
                    package,
                    reason,
                    path.display()
                );
                log::warn!("{}", warning);
                outcome.push_warning(warning);
            }
        }
        if !report.allows_write() {
            return Ok(());
        }

        set_stage_persistent(RunStage::Persisting);
        crate::io::write_file(path, code)?;
        outcome.record_refactored_path(path);
        eprintln!(
            "{} {}",
            "Refactored code saved to:".green().bold(),
            path.display()
        );
        Ok(())
    }

    fn show_analysis(&self, title: &str, analysis: &str) {
        if self.show_panels {
            println!("{}", render_panel(title, analysis));
        }
    }
}

fn join<'a>(names: impl IntoIterator<Item = &'a String>) -> String {
    names
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
