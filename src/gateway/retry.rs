//! Bounded retry around a single model call.

use crate::config::RetryConfig;
use crate::core::{Error, Result};

/// Result of one attempt.
#[derive(Debug)]
pub enum AttemptOutcome<T> {
    Success(T),
    /// Worth another attempt (provider failure, contract violation)
    Transient(Error),
    /// Stop immediately
    Fatal(Error),
}

impl<T> AttemptOutcome<T> {
    /// Classify a fallible attempt by its error.
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(e) if e.is_retryable() => Self::Transient(e),
            Err(e) => Self::Fatal(e),
        }
    }
}

/// Run `attempt` until it succeeds, fails fatally, or the budget is spent.
///
/// The closure receives the 1-based attempt number. Transient failures are
/// only logged at debug level; the caller sees a single `CallFailed` once the
/// budget is exhausted.
pub fn retry_bounded<T>(
    config: &RetryConfig,
    call: &str,
    mut attempt: impl FnMut(u32) -> AttemptOutcome<T>,
) -> Result<T> {
    let budget = config.attempts();
    let mut last_error = None;

    for number in 1..=budget {
        match attempt(number) {
            AttemptOutcome::Success(value) => return Ok(value),
            AttemptOutcome::Fatal(e) => return Err(e),
            AttemptOutcome::Transient(e) => {
                log::debug!("{} attempt {}/{} failed: {}", call, number, budget, e);
                last_error = Some(e);
                if number < budget {
                    std::thread::sleep(config.delay_for_attempt(number));
                }
            }
        }
    }

    Err(Error::CallFailed {
        call: call.to_string(),
        attempts: budget,
        last_error: last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string()),
    })
}
