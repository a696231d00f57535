//! Knowledge management use cases: CRUD, stats and embedding backfill.
//!
//! Embedding generation is best-effort everywhere here. An item without
//! an embedding is still usable (the retrieval fallback reaches it) and
//! the backfill run exists to repair exactly that state.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use domain::Knowledge;

use crate::dtos::{
    BackfillOutcome, CategoryCount, CreateKnowledgeRequest, KnowledgeStatsResponse,
    ListKnowledgeRequest, UpdateKnowledgeRequest,
};
use crate::ports::{EmbeddingProvider, KnowledgeRepository};
use crate::{ApplicationError, ApplicationResult};

/// Items per backfill run when the caller does not specify one.
pub const DEFAULT_BACKFILL_BATCH: usize = 50;

pub struct CreateKnowledgeUseCase {
    knowledge_repository: Arc<dyn KnowledgeRepository>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
}

impl CreateKnowledgeUseCase {
    pub fn new(
        knowledge_repository: Arc<dyn KnowledgeRepository>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            knowledge_repository,
            embedding_provider,
        }
    }

    #[instrument(skip(self, request), fields(owner_id = %request.owner_id))]
    pub async fn execute(&self, request: CreateKnowledgeRequest) -> ApplicationResult<Knowledge> {
        if request.owner_id.is_empty() {
            return Err(ApplicationError::validation("Owner ID cannot be empty"));
        }

        let mut knowledge = Knowledge::new(
            request.owner_id,
            &request.title,
            &request.content,
            request.category,
            request.priority,
        )?;

        match self
            .embedding_provider
            .embed(&knowledge.embedding_text())
            .await
        {
            Ok(embedding) => knowledge.set_embedding(embedding),
            Err(err) => {
                warn!(error = %err, "embedding generation failed, saving without embedding")
            }
        }

        self.knowledge_repository.save(&knowledge).await?;
        info!(knowledge_id = %knowledge.id(), "knowledge item created");
        Ok(knowledge)
    }
}

pub struct UpdateKnowledgeUseCase {
    knowledge_repository: Arc<dyn KnowledgeRepository>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
}

impl UpdateKnowledgeUseCase {
    pub fn new(
        knowledge_repository: Arc<dyn KnowledgeRepository>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            knowledge_repository,
            embedding_provider,
        }
    }

    #[instrument(skip(self, request), fields(knowledge_id = %request.knowledge_id))]
    pub async fn execute(&self, request: UpdateKnowledgeRequest) -> ApplicationResult<Knowledge> {
        let mut knowledge = self
            .knowledge_repository
            .find_by_id(request.knowledge_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::not_found("Knowledge", request.knowledge_id.to_string())
            })?;

        if knowledge.owner_id() != request.owner_id {
            return Err(ApplicationError::access_denied(
                "Knowledge item belongs to a different owner",
            ));
        }

        let title = request
            .title
            .unwrap_or_else(|| knowledge.title().to_string());
        let content = request
            .content
            .unwrap_or_else(|| knowledge.content().to_string());
        let category = request.category.unwrap_or(knowledge.category());
        let priority = request.priority.unwrap_or(knowledge.priority());

        // Re-validates and drops the stale embedding.
        knowledge.update_content(&title, &content, category, priority)?;

        match self
            .embedding_provider
            .embed(&knowledge.embedding_text())
            .await
        {
            Ok(embedding) => knowledge.set_embedding(embedding),
            Err(err) => warn!(error = %err, "embedding regeneration failed, saving without"),
        }

        self.knowledge_repository.update(&knowledge).await?;
        info!(knowledge_id = %knowledge.id(), "knowledge item updated");
        Ok(knowledge)
    }
}

pub struct DeleteKnowledgeUseCase {
    knowledge_repository: Arc<dyn KnowledgeRepository>,
}

impl DeleteKnowledgeUseCase {
    pub fn new(knowledge_repository: Arc<dyn KnowledgeRepository>) -> Self {
        Self {
            knowledge_repository,
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, owner_id: &str, knowledge_id: Uuid) -> ApplicationResult<()> {
        let knowledge = self
            .knowledge_repository
            .find_by_id(knowledge_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Knowledge", knowledge_id.to_string()))?;

        if knowledge.owner_id() != owner_id {
            return Err(ApplicationError::access_denied(
                "Knowledge item belongs to a different owner",
            ));
        }

        self.knowledge_repository.soft_delete(knowledge_id).await?;
        info!(%knowledge_id, "knowledge item soft-deleted");
        Ok(())
    }
}

pub struct ListKnowledgeUseCase {
    knowledge_repository: Arc<dyn KnowledgeRepository>,
}

impl ListKnowledgeUseCase {
    pub fn new(knowledge_repository: Arc<dyn KnowledgeRepository>) -> Self {
        Self {
            knowledge_repository,
        }
    }

    #[instrument(skip(self, request), fields(owner_id = %request.owner_id))]
    pub async fn execute(&self, request: ListKnowledgeRequest) -> ApplicationResult<Vec<Knowledge>> {
        if request.owner_id.is_empty() {
            return Err(ApplicationError::validation("Owner ID cannot be empty"));
        }
        match request.category {
            Some(category) => {
                self.knowledge_repository
                    .find_by_category(&request.owner_id, category)
                    .await
            }
            None => {
                self.knowledge_repository
                    .find_all_active(&request.owner_id)
                    .await
            }
        }
    }
}

pub struct KnowledgeStatsUseCase {
    knowledge_repository: Arc<dyn KnowledgeRepository>,
}

impl KnowledgeStatsUseCase {
    pub fn new(knowledge_repository: Arc<dyn KnowledgeRepository>) -> Self {
        Self {
            knowledge_repository,
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, owner_id: &str) -> ApplicationResult<KnowledgeStatsResponse> {
        if owner_id.is_empty() {
            return Err(ApplicationError::validation("Owner ID cannot be empty"));
        }
        let total = self.knowledge_repository.count_active(owner_id).await?;
        let by_category = self
            .knowledge_repository
            .count_by_category(owner_id)
            .await?
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect();
        Ok(KnowledgeStatsResponse { total, by_category })
    }
}

/// Repair run for items saved without an embedding: embed a bounded
/// batch in one provider call and persist each vector.
pub struct BackfillEmbeddingsUseCase {
    knowledge_repository: Arc<dyn KnowledgeRepository>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
}

impl BackfillEmbeddingsUseCase {
    pub fn new(
        knowledge_repository: Arc<dyn KnowledgeRepository>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            knowledge_repository,
            embedding_provider,
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, batch_size: Option<usize>) -> ApplicationResult<BackfillOutcome> {
        let batch = batch_size.unwrap_or(DEFAULT_BACKFILL_BATCH);
        let candidates = self
            .knowledge_repository
            .find_without_embedding(Some(batch))
            .await?;

        let mut outcome = BackfillOutcome {
            candidates: candidates.len(),
            embedded: 0,
            failures: Vec::new(),
        };
        if candidates.is_empty() {
            return Ok(outcome);
        }

        let texts: Vec<String> = candidates.iter().map(|k| k.embedding_text()).collect();
        let embeddings = match self.embedding_provider.embed_batch(&texts).await {
            Ok(embeddings) => embeddings,
            Err(err) => {
                warn!(error = %err, "batch embedding failed, nothing backfilled");
                outcome.failures.push(format!("batch embedding: {err}"));
                return Ok(outcome);
            }
        };
        if embeddings.len() != candidates.len() {
            outcome.failures.push(format!(
                "batch embedding returned {} vectors for {} items",
                embeddings.len(),
                candidates.len()
            ));
            return Ok(outcome);
        }

        for (mut item, embedding) in candidates.into_iter().zip(embeddings) {
            item.set_embedding(embedding);
            match self.knowledge_repository.update(&item).await {
                Ok(()) => outcome.embedded += 1,
                Err(err) => {
                    warn!(knowledge_id = %item.id(), error = %err, "failed to persist embedding");
                    outcome.failures.push(format!("{}: {err}", item.id()));
                }
            }
        }

        info!(
            candidates = outcome.candidates,
            embedded = outcome.embedded,
            failures = outcome.failures.len(),
            "embedding backfill finished"
        );
        Ok(outcome)
    }
}
