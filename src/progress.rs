//! Progress feedback for long-running model calls.
//!
//! A spinner is shown on stderr while a model call is in flight. Nothing is
//! drawn in quiet mode (`--quiet` or `CODEREFACTOR_QUIET`) or when stderr is
//! not a terminal, so piped and CI output stays clean.

use indicatif::{ProgressBar, ProgressStyle};

pub const TEMPLATE_SPINNER: &str = "{spinner} {msg}";

/// Environment variable that forces quiet mode
pub const QUIET_ENV: &str = "CODEREFACTOR_QUIET";

#[derive(Debug, Clone, Default)]
pub struct ProgressConfig {
    /// Whether to suppress all progress output
    pub quiet_mode: bool,
}

impl ProgressConfig {
    /// Create progress configuration from environment and CLI arguments
    pub fn from_env(quiet: bool) -> Self {
        let env_quiet = std::env::var(QUIET_ENV).is_ok();
        Self {
            quiet_mode: quiet || env_quiet,
        }
    }

    /// Configuration that never draws anything.
    pub fn hidden() -> Self {
        Self { quiet_mode: true }
    }

    pub fn should_show_progress(&self) -> bool {
        if self.quiet_mode {
            return false;
        }

        use std::io::IsTerminal;
        std::io::stderr().is_terminal()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgressManager {
    config: ProgressConfig,
}

impl ProgressManager {
    pub fn new(config: ProgressConfig) -> Self {
        Self { config }
    }

    pub fn hidden() -> Self {
        Self::new(ProgressConfig::hidden())
    }

    /// Create a spinner with the given message
    ///
    /// Returns a hidden progress bar if progress should not be shown
    pub fn create_spinner(&self, msg: &str) -> ProgressBar {
        if !self.config.should_show_progress() {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template(TEMPLATE_SPINNER)
                .expect("Invalid spinner template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}
