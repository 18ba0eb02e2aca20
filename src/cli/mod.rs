//! CLI module for coderefactor
//!
//! - Argument parsing (`args`)
//! - Command handlers (`commands`)
//! - Merging flags over configuration (`config_builder`)
//! - Runtime setup (`setup`)

pub mod args;
pub mod commands;
pub mod config_builder;
pub mod setup;

pub use args::{Cli, ColorChoice};
pub use commands::handle_refactor_command;
pub use config_builder::{resolve_model, RunSettings};
pub use setup::{init_logging, level_for_verbosity};

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    args::parse_args()
}
