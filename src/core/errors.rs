//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for coderefactor operations
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or incomplete configuration (conflicting flags, missing credential,
    /// unsupported provider). Never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The source file could not be read
    #[error("Cannot read {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The model reply was not the structured object the call expected
    #[error("Contract violation: {0}")]
    Contract(String),

    /// Network or provider-side failure while talking to the model service
    #[error("Model service error: {0}")]
    Transport(String),

    /// A model call exhausted its attempt budget
    #[error("{call} failed after {attempts} attempt(s): {last_error}")]
    CallFailed {
        call: String,
        attempts: u32,
        last_error: String,
    },

    /// Interpreter or package manager failure
    #[error("Dependency error: {0}")]
    Dependency(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn input(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Input {
            path: path.into(),
            source,
        }
    }

    pub fn contract(message: impl Into<String>) -> Self {
        Self::Contract(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn dependency(message: impl Into<String>) -> Self {
        Self::Dependency(message.into())
    }

    /// Whether another attempt of the same model call may succeed.
    ///
    /// Provider failures and contract violations are transient; configuration
    /// problems are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Contract(_) | Self::Transport(_) | Self::Json(_))
    }

    /// Whether the error should stop the run with a non-zero exit code.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::Input { .. } | Self::CallFailed { .. }
        )
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
