//! OpenAI embeddings API client backing the embedding port.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use application::ports::EmbeddingProvider;
use application::{ApplicationError, ApplicationResult};

use crate::config::OpenAiConfig;

const OPENAI_API_URL: &str = "https://api.openai.com";

pub struct OpenAiEmbeddingProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiEmbeddingProvider {
    pub fn new(config: OpenAiConfig) -> ApplicationResult<Self> {
        if config.api_key.is_empty() {
            return Err(ApplicationError::configuration(
                "OpenAI API key cannot be empty",
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

    fn embeddings_url(&self) -> String {
        let base = self.config.base_url.as_deref().unwrap_or(OPENAI_API_URL);
        format!("{base}/v1/embeddings")
    }

    async fn post_embeddings<B: Serialize + Sync>(
        &self,
        body: &B,
    ) -> ApplicationResult<EmbeddingResponse> {
        debug!(model = %self.config.model, "sending embedding request to OpenAI");
        let response = self
            .client
            .post(self.embeddings_url())
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    ApplicationError::timeout("openai embeddings")
                } else {
                    ApplicationError::external_service("openai", err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "OpenAI API returned an error");
            let message = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(parsed) => format!(
                    "{} (type: {})",
                    parsed.error.message, parsed.error.error_type
                ),
                Err(_) => format!("status {status}: {body}"),
            };
            return Err(ApplicationError::external_service("openai", message));
        }

        response.json().await.map_err(|err| {
            ApplicationError::external_service("openai", format!("invalid response body: {err}"))
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed(&self, text: &str) -> ApplicationResult<Vec<f32>> {
        let body = EmbeddingRequest {
            input: text,
            model: &self.config.model,
        };
        let parsed = self.post_embeddings(&body).await?;
        let first = parsed.data.into_iter().next().ok_or_else(|| {
            ApplicationError::external_service("openai", "no embedding data returned")
        })?;
        Ok(first.embedding)
    }

    async fn embed_batch(&self, texts: &[String]) -> ApplicationResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let body = BatchEmbeddingRequest {
            input: texts,
            model: &self.config.model,
        };
        let parsed = self.post_embeddings(&body).await?;
        if parsed.data.len() != texts.len() {
            return Err(ApplicationError::external_service(
                "openai",
                format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    parsed.data.len()
                ),
            ));
        }

        // The API does not guarantee response order, reassemble by index.
        let mut embeddings = vec![Vec::new(); texts.len()];
        for item in parsed.data {
            let slot = embeddings.get_mut(item.index).ok_or_else(|| {
                ApplicationError::external_service(
                    "openai",
                    format!("invalid index in response: {}", item.index),
                )
            })?;
            *slot = item.embedding;
        }
        Ok(embeddings)
    }

    fn model_identifier(&self) -> &str {
        &self.config.model
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Debug, Serialize)]
struct BatchEmbeddingRequest<'a> {
    input: &'a [String],
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(rename = "type")]
    error_type: String,
}
