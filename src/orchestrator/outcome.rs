//! The terminal record of one invocation.

use crate::core::AnalysisMode;
use chrono::{DateTime, Local};
use once_cell::unsync::OnceCell;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Append-only outcome of a run.
///
/// Every field is written at most once; later writes are ignored. Warnings
/// can only be appended. The record is frozen by [`RunOutcome::finish`].
#[derive(Debug)]
pub struct RunOutcome {
    source_path: PathBuf,
    mode: AnalysisMode,
    model: String,
    started: Instant,
    started_at: DateTime<Local>,
    elapsed: OnceCell<Duration>,
    analysis: OnceCell<String>,
    refactored_path: OnceCell<PathBuf>,
    failure: OnceCell<String>,
    warnings: RefCell<Vec<String>>,
}

impl RunOutcome {
    pub fn start(source_path: impl Into<PathBuf>, mode: AnalysisMode, model: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            mode,
            model: model.into(),
            started: Instant::now(),
            started_at: Local::now(),
            elapsed: OnceCell::new(),
            analysis: OnceCell::new(),
            refactored_path: OnceCell::new(),
            failure: OnceCell::new(),
            warnings: RefCell::new(Vec::new()),
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn record_analysis(&self, text: impl Into<String>) {
        if self.analysis.set(text.into()).is_err() {
            log::debug!("analysis text already recorded; keeping the first one");
        }
    }

    pub fn record_refactored_path(&self, path: impl Into<PathBuf>) {
        if self.refactored_path.set(path.into()).is_err() {
            log::debug!("refactored path already recorded");
        }
    }

    pub fn record_failure(&self, description: impl Into<String>) {
        if self.failure.set(description.into()).is_err() {
            log::debug!("failure already recorded");
        }
    }

    pub fn push_warning(&self, warning: impl Into<String>) {
        self.warnings.borrow_mut().push(warning.into());
    }

    /// Freeze the elapsed time. Later calls return the frozen value.
    pub fn finish(&self) -> Duration {
        *self.elapsed.get_or_init(|| self.started.elapsed())
    }

    /// Frozen elapsed time, or the running time if not finished yet.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
            .get()
            .copied()
            .unwrap_or_else(|| self.started.elapsed())
    }

    pub fn analysis(&self) -> Option<&str> {
        self.analysis.get().map(String::as_str)
    }

    pub fn refactored_path(&self) -> Option<&Path> {
        self.refactored_path.get().map(PathBuf::as_path)
    }

    pub fn code_written(&self) -> bool {
        self.refactored_path.get().is_some()
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.get().map(String::as_str)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.borrow().clone()
    }

    pub fn succeeded(&self) -> bool {
        self.failure.get().is_none()
    }
}
