// Test doubles shared by the coderefactor integration tests
#![allow(dead_code)]

use coderefactor::config::RetryConfig;
use coderefactor::dependencies::{
    BuiltinAllowlist, ConfirmPrompt, DependencyResolver, PackageEnvironment,
};
use coderefactor::gateway::{CompletionRequest, ModelGateway, ModelTransport};
use coderefactor::validation::SourceValidator;
use coderefactor::{AnalysisOrchestrator, Error, Result};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

/// Replays canned replies in order and records every prompt it receives.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Rc<RefCell<Vec<Result<String>>>>,
    prompts: Rc<RefCell<Vec<String>>>,
    calls: Rc<Cell<u32>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Result<String>>) -> Self {
        let mut replies = replies;
        replies.reverse();
        Self {
            replies: Rc::new(RefCell::new(replies)),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.get()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl ModelTransport for ScriptedTransport {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String> {
        self.calls.set(self.calls.get() + 1);
        self.prompts.borrow_mut().push(request.prompt.to_string());
        self.replies
            .borrow_mut()
            .pop()
            .unwrap_or_else(|| Err(Error::transport("no scripted reply left")))
    }
}

/// In-memory package environment with an install log.
#[derive(Clone, Default)]
pub struct FakeEnvironment {
    pub installed: BTreeSet<String>,
    pub broken: BTreeSet<String>,
    pub attempts: Rc<RefCell<Vec<String>>>,
}

impl FakeEnvironment {
    pub fn with_broken(names: &[&str]) -> Self {
        Self {
            broken: names.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn attempts(&self) -> Vec<String> {
        self.attempts.borrow().clone()
    }
}

impl PackageEnvironment for FakeEnvironment {
    fn is_installed(&self, module: &str) -> bool {
        self.installed.contains(module)
    }

    fn install(&self, distribution: &str) -> Result<()> {
        self.attempts.borrow_mut().push(distribution.to_string());
        if self.broken.contains(distribution) {
            Err(Error::dependency(format!(
                "No matching distribution found for {}",
                distribution
            )))
        } else {
            Ok(())
        }
    }
}

/// Answers the install question with a fixed value and counts how often it was asked.
#[derive(Clone)]
pub struct CountingPrompt {
    answer: bool,
    asked: Rc<Cell<u32>>,
}

impl CountingPrompt {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: Rc::new(Cell::new(0)),
        }
    }

    pub fn asked(&self) -> u32 {
        self.asked.get()
    }
}

impl ConfirmPrompt for CountingPrompt {
    fn confirm_install(&self, _missing: &BTreeSet<String>) -> bool {
        self.asked.set(self.asked.get() + 1);
        self.answer
    }
}

pub fn analysis_reply(text: &str) -> Result<String> {
    Ok(serde_json::json!({ "analysis": text }).to_string())
}

pub fn code_reply(code: &str) -> Result<String> {
    Ok(serde_json::json!({ "code": code }).to_string())
}

pub fn combined_reply(analysis: &str, code: &str) -> Result<String> {
    Ok(serde_json::json!({ "analysis": analysis, "code": code }).to_string())
}

/// Orchestrator wired to test doubles: no interpreter, no panels, no retry delay.
pub fn orchestrator(
    transport: &ScriptedTransport,
    environment: &FakeEnvironment,
    prompt: &CountingPrompt,
    credential: Option<&str>,
) -> AnalysisOrchestrator {
    let gateway = ModelGateway::new(
        Box::new(transport.clone()),
        credential.map(str::to_string),
        "gpt-5",
        RetryConfig::immediate(3),
    );
    let resolver = DependencyResolver::new(
        BuiltinAllowlist::standard(),
        BTreeMap::new(),
        Box::new(environment.clone()),
        Box::new(prompt.clone()),
    );
    AnalysisOrchestrator::new(SourceValidator::syntax_only(), gateway, resolver).with_panels(false)
}
