//! Model gateway: prompt selection, transport, reply contract and retry.
//!
//! Every model call goes through [`ModelGateway::invoke`]. The credential is
//! checked once before the first attempt; a missing key fails with zero
//! attempts. Transport failures and contract violations are retried inside
//! the gateway and never reach the caller one by one.

mod openai;
mod reply;
mod retry;
mod templates;

pub use openai::OpenAiTransport;
pub use reply::{parse_reply, strip_code_fences};
pub use retry::{retry_bounded, AttemptOutcome};
pub use templates::PromptTemplate;

use crate::config::{ModelConfig, RetryConfig};
use crate::core::{CallKind, Error, ModelReply, ModelRequest, Result};
use crate::progress::ProgressManager;
use std::str::FromStr;

/// One prompt sent to a provider.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub api_key: &'a str,
}

/// Sends a prompt and returns the raw reply text.
///
/// Implementations report network and HTTP failures as `Error::Transport`
/// and malformed provider envelopes as `Error::Contract`.
pub trait ModelTransport {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
}

impl Provider {
    pub fn transport(self, config: &ModelConfig) -> Result<Box<dyn ModelTransport>> {
        match self {
            Provider::OpenAi => Ok(Box::new(OpenAiTransport::new(config)?)),
        }
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            other => Err(Error::configuration(format!(
                "unsupported LLM provider '{}' (supported: openai)",
                other
            ))),
        }
    }
}

/// Read the API key from the environment variable named in `config`.
pub fn credential_from_env(config: &ModelConfig) -> Option<String> {
    std::env::var(&config.api_key_env)
        .ok()
        .filter(|key| !key.trim().is_empty())
}

pub struct ModelGateway {
    transport: Box<dyn ModelTransport>,
    credential: Option<String>,
    credential_source: String,
    model: String,
    retry: RetryConfig,
    progress: ProgressManager,
}

impl ModelGateway {
    pub fn new(
        transport: Box<dyn ModelTransport>,
        credential: Option<String>,
        model: impl Into<String>,
        retry: RetryConfig,
    ) -> Self {
        Self {
            transport,
            credential,
            credential_source: "OPENAI_API_KEY".to_string(),
            model: model.into(),
            retry,
            progress: ProgressManager::hidden(),
        }
    }

    /// Name of the variable the credential came from, used in error messages.
    pub fn with_credential_source(mut self, variable: impl Into<String>) -> Self {
        self.credential_source = variable.into();
        self
    }

    pub fn with_progress(mut self, progress: ProgressManager) -> Self {
        self.progress = progress;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Issue one model call with bounded retry.
    pub fn invoke(&self, request: &ModelRequest<'_>) -> Result<ModelReply> {
        let api_key = self
            .credential
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                Error::configuration(format!(
                    "no API key configured; set the {} environment variable",
                    self.credential_source
                ))
            })?;

        let template = PromptTemplate::select(request.mode, request.kind);
        let prompt = template.render(request);
        let call = request.kind.to_string();
        log::debug!(
            "Invoking {} with {:?} template on model {}",
            call,
            template,
            self.model
        );

        let spinner = self.progress.create_spinner(spinner_message(request.kind));
        let result = retry_bounded(&self.retry, &call, |attempt| {
            if attempt > 1 {
                spinner.set_message(format!(
                    "{} (attempt {}/{})",
                    spinner_message(request.kind),
                    attempt,
                    self.retry.attempts()
                ));
            }
            let reply = self
                .transport
                .complete(&CompletionRequest {
                    model: &self.model,
                    prompt: &prompt,
                    api_key,
                })
                .and_then(|raw| parse_reply(template.call_kind(), &raw));
            AttemptOutcome::from_result(reply)
        });
        spinner.finish_and_clear();
        result
    }
}

fn spinner_message(kind: CallKind) -> &'static str {
    match kind {
        CallKind::Analysis => "Performing semantic analysis with LLM...",
        CallKind::Refactor => "Generating refactored code with LLM...",
        CallKind::Combined => "Analyzing and refactoring with LLM...",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AnalysisMode, SourceUnit, ValidationResult};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    struct ScriptedTransport {
        replies: RefCell<Vec<Result<String>>>,
        calls: Rc<Cell<u32>>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<Result<String>>) -> (Self, Rc<Cell<u32>>) {
            let calls = Rc::new(Cell::new(0));
            let mut replies = replies;
            replies.reverse();
            (
                Self {
                    replies: RefCell::new(replies),
                    calls: Rc::clone(&calls),
                },
                calls,
            )
        }
    }

    impl ModelTransport for ScriptedTransport {
        fn complete(&self, _request: &CompletionRequest<'_>) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            self.replies
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| Err(Error::transport("script exhausted")))
        }
    }

    fn fixture() -> (SourceUnit, ValidationResult) {
        (SourceUnit::new("t.py", "x = 1\n"), ValidationResult::default())
    }

    #[test]
    fn test_missing_credential_makes_zero_attempts() {
        let (transport, calls) = ScriptedTransport::new(vec![]);
        let gateway = ModelGateway::new(Box::new(transport), None, "gpt-5", RetryConfig::immediate(3));
        let (source, validation) = fixture();
        let err = gateway
            .invoke(&ModelRequest::analysis(&source, &validation, AnalysisMode::Normal))
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(ref m) if m.contains("OPENAI_API_KEY")));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_contract_violation_is_retried() {
        let (transport, calls) = ScriptedTransport::new(vec![
            Ok("not json".into()),
            Ok(r#"{"analysis": "fine"}"#.into()),
        ]);
        let gateway = ModelGateway::new(
            Box::new(transport),
            Some("sk-test".into()),
            "gpt-5",
            RetryConfig::immediate(3),
        );
        let (source, validation) = fixture();
        let reply = gateway
            .invoke(&ModelRequest::analysis(&source, &validation, AnalysisMode::Expert))
            .unwrap();
        assert_eq!(reply.analysis(), Some("fine"));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_exhaustion_after_three_attempts() {
        let (transport, calls) = ScriptedTransport::new(vec![
            Err(Error::transport("503")),
            Err(Error::transport("503")),
            Err(Error::transport("503")),
        ]);
        let gateway = ModelGateway::new(
            Box::new(transport),
            Some("sk-test".into()),
            "gpt-5",
            RetryConfig::immediate(3),
        );
        let (source, validation) = fixture();
        let err = gateway
            .invoke(&ModelRequest::refactor(&source, &validation, AnalysisMode::Normal, "a"))
            .unwrap_err();
        assert!(matches!(err, Error::CallFailed { attempts: 3, .. }));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert!(matches!(
            "anthropic".parse::<Provider>(),
            Err(Error::Configuration(_))
        ));
    }
}
