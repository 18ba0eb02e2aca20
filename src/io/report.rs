//! Plain-text run report.

use crate::core::Result;
use crate::orchestrator::RunOutcome;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const REPORT_SUFFIX: &str = "_report.txt";

/// `"M minutes and S.SS seconds"`, or `"S.SS seconds"` under a minute.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs_f64();
    let minutes = (total / 60.0).floor() as u64;
    let seconds = total - (minutes as f64) * 60.0;
    if minutes > 0 {
        format!("{} minutes and {:.2} seconds", minutes, seconds)
    } else {
        format!("{:.2} seconds", seconds)
    }
}

pub fn report_file_name(stem: &str) -> String {
    format!("{}{}", stem, REPORT_SUFFIX)
}

pub fn render_report(outcome: &RunOutcome) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "Code Refactor Report");
    let _ = writeln!(
        out,
        "Generated: {}",
        outcome.started_at().format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out, "Source: {}", outcome.source_path().display());
    let _ = writeln!(out, "Mode: {} (model {})", outcome.mode(), outcome.model());
    let _ = writeln!(out, "Analysis completed in {}", format_elapsed(outcome.elapsed()));

    if let Some(path) = outcome.refactored_path() {
        let _ = writeln!(out, "Refactored code written to: {}", path.display());
    }

    let warnings = outcome.warnings();
    if !warnings.is_empty() {
        let _ = writeln!(out, "\nWarnings:");
        for warning in &warnings {
            let _ = writeln!(out, "- {}", warning);
        }
    }

    if let Some(failure) = outcome.failure() {
        let _ = writeln!(out, "\nRun failed: {}", failure);
    }

    if let Some(analysis) = outcome.analysis() {
        let _ = writeln!(out, "\nAI Semantic Analysis:\n{}", analysis);
    }
    out
}

/// Write the report for `outcome` into `dir`, returning the report path.
pub fn write_report(dir: &Path, stem: &str, outcome: &RunOutcome) -> Result<PathBuf> {
    let path = dir.join(report_file_name(stem));
    super::write_file(&path, &render_report(outcome))?;
    Ok(path)
}
