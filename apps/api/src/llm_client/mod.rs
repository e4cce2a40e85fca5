/// LLM Client: the single point of entry for chat-completion calls.
///
/// No other module talks to the text-generation service directly.
/// The client makes exactly one attempt per call; callers own recovery.
///
/// Model: gpt-4 (hardcoded so output style does not drift between deployments)
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

/// The model used for all generation calls.
pub const MODEL: &str = "gpt-4";
const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API key not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, if it carries any non-blank content.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Chat-completion client shared by all handlers through `AppState`.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    api_url: String,
}

impl LlmClient {
    pub fn new(api_key: Option<String>, api_url: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()?,
            api_key,
            api_url,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Sends one chat-completion request and returns the first choice's text.
    pub async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        debug!("LLM API responded with {status}");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}: {}", status, body);
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed = parse_chat_response(&body)?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        parsed
            .text()
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

fn parse_chat_response(body: &str) -> Result<ChatResponse, LlmError> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_choice_text() {
        let body = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "First draft"}},
                {"message": {"role": "assistant", "content": "Second draft"}}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30}
        }"#;
        let parsed = parse_chat_response(body).unwrap();
        assert_eq!(parsed.text(), Some("First draft"));
        assert_eq!(parsed.usage.unwrap().completion_tokens, 20);
    }

    #[test]
    fn test_blank_content_is_no_text() {
        let body = r#"{"choices": [{"message": {"content": "   "}}]}"#;
        assert!(parse_chat_response(body).unwrap().text().is_none());

        let body = r#"{"choices": []}"#;
        assert!(parse_chat_response(body).unwrap().text().is_none());
    }

    #[test]
    fn test_malformed_body_is_parse_error() {
        let err = parse_chat_response("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let client = LlmClient::new(None, "http://127.0.0.1:9/unused".to_string()).unwrap();
        assert!(!client.is_configured());
        let err = client.complete("prompt", "system").await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }
}
