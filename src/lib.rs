// Export modules for library usage
pub mod cli;
pub mod config;
pub mod core;
pub mod dependencies;
pub mod formatting;
pub mod gateway;
pub mod io;
pub mod observability;
pub mod orchestrator;
pub mod progress;
pub mod python;
pub mod validation;

// Re-export commonly used types
pub use crate::core::{
    AnalysisMode, CallKind, Error, ModelReply, ModelRequest, Result, SourceUnit, ValidationResult,
};

pub use crate::config::{load_config, load_config_from, RefactorConfig, RetryConfig};

pub use crate::dependencies::{
    classify_missing, extract_imports, BuiltinAllowlist, DependencyReport, DependencyResolver,
    Resolution,
};

pub use crate::gateway::{ModelGateway, ModelTransport, PromptTemplate};

pub use crate::orchestrator::{AnalysisOrchestrator, RunOutcome};

pub use crate::validation::{check_syntax, SourceValidator};
