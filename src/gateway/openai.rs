//! OpenAI Chat Completions transport.

use super::{CompletionRequest, ModelTransport};
use crate::config::ModelConfig;
use crate::core::{Error, Result};
use serde::Deserialize;
use std::time::Duration;

/// Default OpenAI API endpoint
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Blocking client for one prompt-in, JSON-object-out exchange.
pub struct OpenAiTransport {
    client: reqwest::blocking::Client,
    endpoint: String,
    temperature: Option<f32>,
}

impl OpenAiTransport {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::configuration(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: config
                .base_url
                .clone()
                .unwrap_or_else(|| OPENAI_API_URL.to_string()),
            temperature: config.temperature,
        })
    }

    fn build_request_body(&self, request: &CompletionRequest<'_>) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": request.model,
            "messages": [
                { "role": "user", "content": request.prompt }
            ],
            "response_format": { "type": "json_object" },
        });
        if let Some(temperature) = self.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }
        body
    }
}

impl ModelTransport for OpenAiTransport {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String> {
        let body = self.build_request_body(request);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(request.api_key)
            .json(&body)
            .send()
            .map_err(|e| Error::transport(e.to_string()))?;

        let status = response.status();
        let body_text = response
            .text()
            .map_err(|e| Error::transport(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::transport(format!(
                "HTTP {}: {}",
                status.as_u16(),
                error_message(&body_text)
            )));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body_text)
            .map_err(|e| Error::transport(format!("unexpected response shape: {}", e)))?;
        first_message(parsed)
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

fn first_message(response: ChatCompletionResponse) -> Result<String> {
    let message = response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or_else(|| Error::contract("response contained no choices"))?;
    if let Some(refusal) = message.refusal {
        return Err(Error::contract(format!("model refused: {}", refusal)));
    }
    message
        .content
        .ok_or_else(|| Error::contract("response message has no content"))
}

/// Provider error text from an `{"error": {"message": ...}}` body, or the body itself.
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }
    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body.chars().take(200).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> OpenAiTransport {
        OpenAiTransport::new(&ModelConfig::default()).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let body = transport().build_request_body(&CompletionRequest {
            model: "gpt-5",
            prompt: "analyze this",
            api_key: "sk-test",
        });
        assert_eq!(body["model"], "gpt-5");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "analyze this");
        assert_eq!(body["response_format"]["type"], "json_object");
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_temperature_is_sent_when_configured() {
        let config = ModelConfig {
            temperature: Some(1.0),
            ..Default::default()
        };
        let body = OpenAiTransport::new(&config)
            .unwrap()
            .build_request_body(&CompletionRequest {
                model: "gpt-5",
                prompt: "p",
                api_key: "k",
            });
        assert_eq!(body["temperature"], 1.0);
    }

    #[test]
    fn test_first_message_content() {
        let parsed: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "{\"analysis\": \"ok\"}"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_message(parsed).unwrap(), r#"{"analysis": "ok"}"#);
    }

    #[test]
    fn test_refusal_is_contract_violation() {
        let parsed: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"content": null, "refusal": "cannot help"}}]}"#,
        )
        .unwrap();
        assert!(matches!(first_message(parsed), Err(Error::Contract(_))));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"error": {"message": "Invalid API key", "type": "auth"}}"#),
            "Invalid API key"
        );
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }
}
