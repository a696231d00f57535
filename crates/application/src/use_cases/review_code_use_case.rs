//! Review generation pipeline: retrieve knowledge, build the prompt,
//! call the model, parse the result, persist, record usage.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use domain::services::{
    build_knowledge_prompt, build_system_prompt, build_user_prompt, parse_review_markdown,
};
use domain::{Knowledge, Review};

use crate::dtos::{ReviewCodeRequest, ReviewCodeResponse};
use crate::ports::{
    CompletionProvider, CompletionRequest, EmbeddingProvider, KnowledgeRepository,
    ReviewRepository,
};
use crate::{is_supported_language, ApplicationError, ApplicationResult};

/// Similarity search tuning.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub min_similarity: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            min_similarity: 0.35,
        }
    }
}

/// Pipeline tuning injected from configuration.
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    pub retrieval: RetrievalConfig,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            retrieval: RetrievalConfig::default(),
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

/// Result of the retrieval stage. `used_fallback` marks the degraded
/// path where embedding failed and all active items were fetched
/// unranked instead.
#[derive(Debug)]
pub struct Retrieval {
    pub items: Vec<Knowledge>,
    pub used_fallback: bool,
}

/// Result of best-effort usage tracking.
#[derive(Debug, Default)]
pub struct TrackOutcome {
    pub updated: usize,
    pub failures: usize,
}

#[async_trait]
pub trait ReviewCodeUseCase: Send + Sync {
    async fn review_code(&self, request: ReviewCodeRequest)
        -> ApplicationResult<ReviewCodeResponse>;
}

pub struct ReviewCodeUseCaseImpl {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    completion_provider: Arc<dyn CompletionProvider>,
    knowledge_repository: Arc<dyn KnowledgeRepository>,
    review_repository: Arc<dyn ReviewRepository>,
    config: ReviewConfig,
}

impl ReviewCodeUseCaseImpl {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        completion_provider: Arc<dyn CompletionProvider>,
        knowledge_repository: Arc<dyn KnowledgeRepository>,
        review_repository: Arc<dyn ReviewRepository>,
        config: ReviewConfig,
    ) -> Self {
        Self {
            embedding_provider,
            completion_provider,
            knowledge_repository,
            review_repository,
            config,
        }
    }
}

#[async_trait]
impl ReviewCodeUseCase for ReviewCodeUseCaseImpl {
    #[instrument(skip(self, request), fields(owner_id = %request.owner_id, language = %request.language))]
    async fn review_code(
        &self,
        request: ReviewCodeRequest,
    ) -> ApplicationResult<ReviewCodeResponse> {
        self.validate_request(&request)?;

        let query = build_query_text(&request.code, &request.language, request.context.as_deref());
        let retrieval = self
            .retrieve_knowledge(&request.owner_id, &query)
            .await?;
        info!(
            candidates = retrieval.items.len(),
            used_fallback = retrieval.used_fallback,
            "knowledge retrieval complete"
        );

        let prompt = build_knowledge_prompt(retrieval.items);
        let referenced = prompt.used_ids();
        let system = build_system_prompt(&prompt.text);
        let user = build_user_prompt(&request.code, &request.language, request.context.as_deref());

        let completion = self
            .completion_provider
            .complete(CompletionRequest {
                system,
                user,
                max_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
            })
            .await?;

        let structured = parse_review_markdown(&completion.text);

        let mut review = Review::new(
            request.owner_id,
            request.code,
            request.language,
            request.context,
        );
        review.set_review_result(
            completion.text,
            structured,
            referenced,
            completion.provider,
            completion.model,
            completion.tokens_used,
        );

        self.review_repository.save(&review).await?;

        // Usage tracking happens after the review is durable and never
        // rolls it back.
        let outcome = self.track_usage(prompt.used).await;
        if outcome.failures > 0 {
            warn!(
                updated = outcome.updated,
                failures = outcome.failures,
                "usage tracking finished with failures"
            );
        }

        info!(review_id = %review.id(), tokens = review.tokens_used(), "review persisted");

        Ok(ReviewCodeResponse {
            review,
            used_fallback: retrieval.used_fallback,
        })
    }
}

impl ReviewCodeUseCaseImpl {
    fn validate_request(&self, request: &ReviewCodeRequest) -> ApplicationResult<()> {
        if request.owner_id.is_empty() {
            return Err(ApplicationError::validation("Owner ID cannot be empty"));
        }
        if request.code.trim().is_empty() {
            return Err(ApplicationError::validation("Code cannot be empty"));
        }
        if !is_supported_language(&request.language) {
            return Err(ApplicationError::validation(format!(
                "Unsupported language: {}",
                request.language
            )));
        }
        Ok(())
    }

    async fn retrieve_knowledge(
        &self,
        owner_id: &str,
        query: &str,
    ) -> ApplicationResult<Retrieval> {
        match self.embedding_provider.embed(query).await {
            Ok(embedding) => {
                let items = self
                    .knowledge_repository
                    .search_by_similarity(
                        owner_id,
                        &embedding,
                        self.config.retrieval.top_k,
                        self.config.retrieval.min_similarity,
                    )
                    .await?;
                Ok(Retrieval {
                    items,
                    used_fallback: false,
                })
            }
            Err(err) => {
                warn!(error = %err, "embedding failed, falling back to all active knowledge");
                let items = self.knowledge_repository.find_all_active(owner_id).await?;
                Ok(Retrieval {
                    items,
                    used_fallback: true,
                })
            }
        }
    }

    async fn track_usage(&self, used: Vec<Knowledge>) -> TrackOutcome {
        let mut outcome = TrackOutcome::default();
        for mut item in used {
            item.record_usage();
            match self.knowledge_repository.update(&item).await {
                Ok(()) => outcome.updated += 1,
                Err(err) => {
                    outcome.failures += 1;
                    warn!(knowledge_id = %item.id(), error = %err, "failed to record knowledge usage");
                }
            }
        }
        outcome
    }
}

/// Text embedded for retrieval. Mirrors the user prompt closely enough
/// that knowledge relevant to the prompt is relevant to the query.
fn build_query_text(code: &str, language: &str, context: Option<&str>) -> String {
    let mut query = format!("Language: {language}\n\n{code}");
    if let Some(ctx) = context {
        if !ctx.is_empty() {
            query.push_str(&format!("\n\nContext: {ctx}"));
        }
    }
    query
}
