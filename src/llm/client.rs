use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration for the chat-completions provider
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API key (from GROQ_API_KEY)
    pub api_key: String,
    /// Chat completions endpoint
    pub api_url: String,
    /// Model used for scoring and for the interviewer persona
    pub model: String,
    /// Per-attempt request timeout
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
}

pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

impl ProviderConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 1,
        }
    }
}

/// Failures talking to the provider. Malformed replies are not errors here;
/// they are handled by the validator.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider request timed out after {0:?}")]
    Timeout(Duration),
    #[error("failed to reach provider: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("provider returned no content")]
    EmptyResponse,
}

impl ProviderError {
    /// Whether another attempt could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Http(_) | Self::EmptyResponse => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Provider-neutral completion request built by the prompt builders
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: Option<u32>,
    /// Ask the provider to constrain output to a JSON object
    pub json_mode: bool,
}

/// Seam between the pipeline and the language model
pub trait CompletionProvider: Send + Sync {
    /// Return the text of the first completion choice
    fn complete(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;
}

/// Groq chat-completions client (OpenAI-compatible wire format)
pub struct GroqClient {
    client: Client,
    config: ProviderConfig,
}

impl GroqClient {
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn to_wire<'a>(&'a self, request: &'a ChatRequest) -> CompletionRequest<'a> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(WireMessage {
            role: ChatRole::System,
            content: &request.system,
        });
        messages.extend(request.messages.iter().map(|m| WireMessage {
            role: m.role,
            content: &m.content,
        }));

        CompletionRequest {
            model: &self.config.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_mode.then_some(ResponseFormat {
                format_type: "json_object",
            }),
            stream: false,
        }
    }
}

impl CompletionProvider for GroqClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, ProviderError> {
        let body = self.to_wire(request);
        debug!(
            "Sending {} messages to {} ({} system chars)",
            body.messages.len(),
            self.config.model,
            request.system.len()
        );

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let response: CompletionResponse = response.json().await.map_err(|e| self.classify(e))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ProviderError::EmptyResponse)
    }
}

impl GroqClient {
    fn classify(&self, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::Timeout(self.config.timeout)
        } else {
            ProviderError::Http(error)
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: ChatRole,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GroqClient {
        GroqClient::new(ProviderConfig::new("test-key".to_string())).unwrap()
    }

    #[test]
    fn test_wire_request_prepends_system_message() {
        let client = client();
        let request = ChatRequest {
            system: "be strict".to_string(),
            messages: vec![ChatMessage::new(ChatRole::User, "transcript")],
            temperature: 0.2,
            max_tokens: None,
            json_mode: true,
        };

        let json = serde_json::to_value(client.to_wire(&request)).unwrap();

        assert_eq!(json["model"], DEFAULT_MODEL);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "be strict");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["response_format"]["type"], "json_object");
        assert!(json.get("max_tokens").is_none());
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn test_wire_request_without_json_mode() {
        let client = client();
        let request = ChatRequest {
            system: "persona".to_string(),
            messages: vec![],
            temperature: 0.7,
            max_tokens: Some(150),
            json_mode: false,
        };

        let json = serde_json::to_value(client.to_wire(&request)).unwrap();

        assert!(json.get("response_format").is_none());
        assert_eq!(json["max_tokens"], 150);
    }

    #[test]
    fn test_parse_completion_response() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": "{\"technical_score\": 80}"}}]}"#;
        let response: CompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.choices[0].message.content.as_deref(),
            Some("{\"technical_score\": 80}")
        );
    }

    #[test]
    fn test_retryable_errors() {
        assert!(ProviderError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(
            ProviderError::Status {
                status: 503,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(
            ProviderError::Status {
                status: 429,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(
            !ProviderError::Status {
                status: 401,
                body: String::new()
            }
            .is_retryable()
        );
    }
}
