//! Crash reporting and run-context tracking.
//!
//! Install the panic hook at startup; the orchestrator records the stage it
//! is in so a crash report shows where the run stopped.
//!
//! ```ignore
//! use coderefactor::observability::{install_panic_hook, set_stage_persistent, RunStage};
//!
//! install_panic_hook();
//! set_stage_persistent(RunStage::Validating);
//! ```

pub mod context;
pub mod panic_hook;

pub use context::{
    current_stage, get_current_context, reset_context, set_current_call, set_current_file,
    set_stage_persistent, ContextGuard, RunContext, RunStage,
};
pub use panic_hook::install_panic_hook;
