//! The closed set of prompt templates.
//!
//! Selection depends only on the mode and the call kind, never on the source.
//! Each template states the reply fields it asks for; the same list drives
//! reply validation, so a template and its contract cannot drift apart.

use crate::core::{AnalysisMode, CallKind, ModelRequest};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{(code|error_context|analysis|focus)\}").expect("Invalid placeholder pattern")
});

const NORMAL_ANALYSIS: &str = r#"You are a professional Python code reviewer. Analyze the semantics of the Python code below: logical errors, security issues, performance bottlenecks, and overall code quality. Explain what the code does and suggest improvements. Short illustrative snippets are fine, but do not return a full rewrite.
Reply with a single JSON object with exactly one string field, "analysis", for example {"analysis": "..."}.
{error_context}

```python
{code}
```"#;

const EXPERT_ANALYSIS: &str = r#"You are a professional Python code reviewer working in expert mode. Analyze the Python code below in depth: logical errors, security issues, and code quality, with the primary goal of minimizing runtime and memory consumption. Explain what the code does and give detailed, performance-oriented recommendations. Avoid returning a full rewrite.
Reply with a single JSON object with exactly one string field, "analysis", for example {"analysis": "..."}.
{error_context}

```python
{code}
```"#;

const BASIC_COMBINED: &str = r#"You are a professional Python code reviewer working in basic mode, where speed matters more than depth. Give a short semantic analysis of the Python code below (logical errors, obvious improvements, security, performance), then a beginner-friendly refactored version with minimal changes, the imports it needs, and light comments. Do not over-engineer.
Reply with a single JSON object with exactly two string fields, "analysis" and "code", for example {"analysis": "...", "code": "..."}.
{error_context}

```python
{code}
```"#;

const REFACTOR: &str = r#"You are an experienced Python engineer. Refactor the Python code below using the analysis that follows it. Fix bugs, improve readability, and add comments where they help. {focus} Keep the existing behaviour and overall structure; do not add or remove features. Keep using print for output if the code already does.
Reply with a single JSON object with exactly one string field, "code", containing the complete refactored source, for example {"code": "..."}.

```python
{code}
```

Analysis: {analysis}"#;

const STANDARD_FOCUS: &str = "Follow common best practices and keep performance reasonable.";
const EXPERT_FOCUS: &str =
    "Above all, minimize runtime and memory consumption, even where that changes how a function works internally.";

/// One of the four prompt shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptTemplate {
    NormalAnalysis,
    ExpertAnalysis,
    BasicCombined,
    Refactor,
}

impl PromptTemplate {
    pub fn select(mode: AnalysisMode, kind: CallKind) -> Self {
        match (mode, kind) {
            (_, CallKind::Combined) => Self::BasicCombined,
            (_, CallKind::Refactor) => Self::Refactor,
            (AnalysisMode::Expert, CallKind::Analysis) => Self::ExpertAnalysis,
            (AnalysisMode::Normal | AnalysisMode::Basic, CallKind::Analysis) => {
                Self::NormalAnalysis
            }
        }
    }

    /// Call kind whose reply contract this template asks for.
    pub fn call_kind(self) -> CallKind {
        match self {
            Self::NormalAnalysis | Self::ExpertAnalysis => CallKind::Analysis,
            Self::BasicCombined => CallKind::Combined,
            Self::Refactor => CallKind::Refactor,
        }
    }

    fn text(self) -> &'static str {
        match self {
            Self::NormalAnalysis => NORMAL_ANALYSIS,
            Self::ExpertAnalysis => EXPERT_ANALYSIS,
            Self::BasicCombined => BASIC_COMBINED,
            Self::Refactor => REFACTOR,
        }
    }

    /// Fill the template in a single pass; substituted values are never rescanned.
    pub fn render(self, request: &ModelRequest<'_>) -> String {
        let error_context = request.validation.advisory_context();
        let analysis = request
            .prior_analysis
            .as_deref()
            .unwrap_or("No prior analysis available");
        let focus = match request.mode {
            AnalysisMode::Expert => EXPERT_FOCUS,
            AnalysisMode::Normal | AnalysisMode::Basic => STANDARD_FOCUS,
        };

        PLACEHOLDER
            .replace_all(self.text(), |caps: &Captures<'_>| match &caps[1] {
                "code" => request.source.text().to_string(),
                "error_context" => error_context.clone(),
                "analysis" => analysis.to_string(),
                _ => focus.to_string(),
            })
            .into_owned()
    }
}
