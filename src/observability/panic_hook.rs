//! Panic hook printing a crash report with the run context.

use super::context::{get_current_context, RunContext};
use std::panic::PanicHookInfo;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const WIDTH: usize = 76;

/// Replace the default panic output with a structured crash report.
///
/// Call once at the start of `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        print_crash_report(info);
    }));
}

fn print_crash_report(info: &PanicHookInfo<'_>) {
    let context = get_current_context();
    eprintln!();
    for line in crash_report_lines(&context, &extract_panic_message(info), location(info)) {
        eprintln!("{}", line);
    }
    if std::env::var("RUST_BACKTRACE").is_ok() {
        eprintln!();
        eprintln!("{}", std::backtrace::Backtrace::capture());
    }
}

fn location(info: &PanicHookInfo<'_>) -> Option<String> {
    info.location()
        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
}

fn crash_report_lines(context: &RunContext, message: &str, location: Option<String>) -> Vec<String> {
    let rule = "═".repeat(WIDTH + 2);
    let row = |text: String| format!("║ {:<width$} ║", truncate(&text, WIDTH), width = WIDTH);

    let mut lines = vec![
        format!("╔{}╗", rule),
        row("CODEREFACTOR CRASH REPORT".to_string()),
        format!("╠{}╣", rule),
        row(format!("Version: {}", VERSION)),
        row(format!("Platform: {}", std::env::consts::OS)),
        row(format!(
            "Time: {}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )),
        format!("╠{}╣", rule),
        row(format!("PANIC: {}", message)),
    ];
    if let Some(location) = location {
        lines.push(row(format!("Location: {}", location)));
    }

    lines.push(format!("╠{}╣", rule));
    lines.push(row(match context.stage {
        Some(stage) => format!("Stage: {}", stage),
        None => "Stage: (not set, crash occurred before the run started)".to_string(),
    }));
    if let Some(file) = &context.current_file {
        lines.push(row(format!("File: {}", file.display())));
    }
    if let Some(call) = &context.current_call {
        lines.push(row(format!("Model call: {}", call)));
    }
    if std::env::var("RUST_BACKTRACE").is_err() {
        lines.push(row("Run with RUST_BACKTRACE=1 for stack trace".to_string()));
    }
    lines.push(format!("╚{}╝", rule));
    lines
}

fn extract_panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
