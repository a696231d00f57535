//! Claude Messages API client backing the completion port.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use application::ports::{CompletionProvider, CompletionRequest, CompletionResponse};
use application::{ApplicationError, ApplicationResult};

use crate::config::ClaudeConfig;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug)]
pub struct AnthropicProvider {
    config: ClaudeConfig,
    client: Client,
}

impl AnthropicProvider {
    pub fn new(config: ClaudeConfig) -> ApplicationResult<Self> {
        if config.api_key.is_empty() {
            return Err(ApplicationError::configuration(
                "Claude API key cannot be empty",
            ));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| {
                ApplicationError::configuration(format!("Failed to build HTTP client: {err}"))
            })?;
        Ok(Self { config, client })
    }

    fn messages_url(&self) -> String {
        let base = self
            .config
            .base_url
            .as_deref()
            .unwrap_or(ANTHROPIC_API_URL);
        format!("{base}/v1/messages")
    }
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    async fn complete(&self, request: CompletionRequest) -> ApplicationResult<CompletionResponse> {
        let body = MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: request.max_tokens,
            system: request.system,
            messages: vec![Message {
                role: "user".to_string(),
                content: request.user,
            }],
            temperature: request.temperature,
        };

        debug!(model = %self.config.model, "sending completion request to Claude");
        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    ApplicationError::timeout("claude completion")
                } else {
                    ApplicationError::external_service("claude", err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Claude API returned an error");
            return Err(ApplicationError::external_service(
                "claude",
                format!("status {status}: {body}"),
            ));
        }

        let parsed: MessagesResponse = response.json().await.map_err(|err| {
            ApplicationError::external_service("claude", format!("invalid response body: {err}"))
        })?;
        if parsed.content.is_empty() {
            return Err(ApplicationError::external_service(
                "claude",
                "response contained no content blocks",
            ));
        }

        let text: String = parsed
            .content
            .into_iter()
            .filter(|block| block.block_type == "text")
            .map(|block| block.text)
            .collect();
        let tokens_used = parsed.usage.input_tokens + parsed.usage.output_tokens;

        Ok(CompletionResponse {
            text,
            tokens_used,
            provider: "claude".to_string(),
            model: self.config.model.clone(),
        })
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}
