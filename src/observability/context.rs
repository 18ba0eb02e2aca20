//! Thread-local run context for crash reports.
//!
//! Records which stage of a run is active, which file is being processed and
//! which model call is in flight. Guards restore the previous value on drop.

use std::cell::RefCell;
use std::path::PathBuf;

thread_local! {
    static CURRENT_CONTEXT: RefCell<RunContext> = const { RefCell::new(RunContext::new()) };
}

/// Snapshot of what the program was doing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunContext {
    pub stage: Option<RunStage>,
    pub current_file: Option<PathBuf>,
    pub current_call: Option<String>,
}

impl RunContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stage: None,
            current_file: None,
            current_call: None,
        }
    }
}

/// Stages of one analysis run, in the order they are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Validating,
    ModeDispatch,
    NormalFlow,
    BasicFlow,
    ExpertFlow,
    DependencyGate,
    Persisting,
    Done,
}

impl std::fmt::Display for RunStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validating => write!(f, "validating"),
            Self::ModeDispatch => write!(f, "mode_dispatch"),
            Self::NormalFlow => write!(f, "normal_flow"),
            Self::BasicFlow => write!(f, "basic_flow"),
            Self::ExpertFlow => write!(f, "expert_flow"),
            Self::DependencyGate => write!(f, "dependency_gate"),
            Self::Persisting => write!(f, "persisting"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Restores the previous context when dropped.
pub struct ContextGuard {
    previous: RunContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

fn update(apply: impl FnOnce(&mut RunContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        apply(&mut ctx.borrow_mut());
        ContextGuard { previous }
    })
}

/// Enter `stage`; it stays recorded until the next stage is entered.
pub fn set_stage_persistent(stage: RunStage) {
    CURRENT_CONTEXT.with(|ctx| {
        ctx.borrow_mut().stage = Some(stage);
    });
}

#[must_use]
pub fn set_current_file(path: impl Into<PathBuf>) -> ContextGuard {
    let path = path.into();
    update(|ctx| ctx.current_file = Some(path))
}

#[must_use]
pub fn set_current_call(call: impl Into<String>) -> ContextGuard {
    let call = call.into();
    update(|ctx| ctx.current_call = Some(call))
}

#[must_use]
pub fn get_current_context() -> RunContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// Stage the current thread is in, if any.
pub fn current_stage() -> Option<RunStage> {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().stage)
}

pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = RunContext::new();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_restores_previous_call() {
        reset_context();

        let _outer = set_current_call("analysis call");
        {
            let _inner = set_current_call("refactor call");
            assert_eq!(
                get_current_context().current_call.as_deref(),
                Some("refactor call")
            );
        }
        assert_eq!(
            get_current_context().current_call.as_deref(),
            Some("analysis call")
        );
    }

    #[test]
    fn test_file_and_call_are_tracked() {
        reset_context();

        let _file = set_current_file("/tmp/sample.py");
        let _call = set_current_call("refactor call");
        let ctx = get_current_context();
        assert_eq!(ctx.current_file, Some(PathBuf::from("/tmp/sample.py")));
        assert_eq!(ctx.current_call.as_deref(), Some("refactor call"));
    }

    #[test]
    fn test_persistent_stage_survives_scope() {
        reset_context();

        {
            set_stage_persistent(RunStage::DependencyGate);
        }
        assert_eq!(current_stage(), Some(RunStage::DependencyGate));
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(RunStage::ModeDispatch.to_string(), "mode_dispatch");
        assert_eq!(RunStage::DependencyGate.to_string(), "dependency_gate");
    }
}
