//! Configuration for coderefactor.
//!
//! Loaded from `.coderefactor.toml` (see [`loader`]); every section has serde
//! defaults, so an empty or partial file is valid. Command-line flags override
//! whatever the file says.

mod loader;
pub mod retry;

pub use loader::{directory_ancestors, load_config, load_config_from, parse_config};
pub use retry::{RetryConfig, RetryStrategy};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Name of the configuration file searched for in the current directory and its ancestors.
pub const CONFIG_FILE_NAME: &str = ".coderefactor.toml";

/// Root configuration structure for coderefactor
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RefactorConfig {
    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub dependencies: DependencyConfig,

    #[serde(default)]
    pub python: PythonConfig,
}

/// Model service settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    /// Provider identifier (only "openai" is supported)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model used in normal and expert mode
    #[serde(default = "default_normal_model")]
    pub normal_model: String,

    /// Model used in basic mode
    #[serde(default = "default_basic_model")]
    pub basic_model: String,

    /// Environment variable holding the API credential
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Override for the chat completions endpoint
    #[serde(default)]
    pub base_url: Option<String>,

    /// Per-request network timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Sampling temperature; omitted from requests when unset
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            normal_model: default_normal_model(),
            basic_model: default_basic_model(),
            api_key_env: default_api_key_env(),
            base_url: None,
            request_timeout_secs: default_request_timeout_secs(),
            temperature: None,
        }
    }
}

/// Dependency reconciliation settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DependencyConfig {
    /// Extra module names treated as always available
    #[serde(default)]
    pub extra_allowlist: Vec<String>,

    /// Import name -> distribution name overrides used when installing
    #[serde(default)]
    pub package_aliases: BTreeMap<String, String>,
}

/// Local interpreter settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PythonConfig {
    /// Interpreter to use instead of searching PATH for python3/python
    #[serde(default)]
    pub interpreter: Option<PathBuf>,

    /// Wall-clock limit for the runtime check
    #[serde(default = "default_runtime_timeout_secs")]
    pub runtime_timeout_secs: u64,
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            interpreter: None,
            runtime_timeout_secs: default_runtime_timeout_secs(),
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_normal_model() -> String {
    crate::core::AnalysisMode::DEFAULT_MODEL.to_string()
}

fn default_basic_model() -> String {
    crate::core::AnalysisMode::DEFAULT_BASIC_MODEL.to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_runtime_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: RefactorConfig = toml::from_str("").unwrap();
        assert_eq!(config, RefactorConfig::default());
        assert_eq!(config.model.provider, "openai");
        assert_eq!(config.model.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.python.runtime_timeout_secs, 10);
    }

    #[test]
    fn test_partial_sections() {
        let config: RefactorConfig = toml::from_str(
            r#"
            [model]
            basic_model = "gpt-5-nano"

            [dependencies]
            extra_allowlist = ["numpy"]
            package_aliases = { magic = "python-magic" }
            "#,
        )
        .unwrap();
        assert_eq!(config.model.basic_model, "gpt-5-nano");
        assert_eq!(config.model.normal_model, "gpt-5");
        assert_eq!(config.dependencies.extra_allowlist, vec!["numpy"]);
        assert_eq!(
            config.dependencies.package_aliases.get("magic").map(String::as_str),
            Some("python-magic")
        );
    }
}
