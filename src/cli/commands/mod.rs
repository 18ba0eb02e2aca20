//! Command handlers for the CLI.

mod refactor;

pub use refactor::handle_refactor_command;
