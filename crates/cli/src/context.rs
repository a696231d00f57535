//! Wiring between the binary and the concrete adapters.
//!
//! Stores open lazily so read-only commands work without API keys; the
//! provider constructors are only called by commands that talk to a
//! model.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use application::use_cases::ReviewConfig;
use llm::{AnthropicProvider, ClaudeConfig, OpenAiConfig, OpenAiEmbeddingProvider};
use store::{InMemoryKnowledgeStore, InMemoryReviewStore};

pub fn open_knowledge_store() -> Result<Arc<InMemoryKnowledgeStore>> {
    let path = common::knowledge_snapshot_path();
    let store = InMemoryKnowledgeStore::with_snapshot(path.clone())
        .with_context(|| format!("failed to open knowledge store at {}", path.display()))?;
    debug!("knowledge store ready at {}", path.display());
    Ok(Arc::new(store))
}

pub fn open_review_store() -> Result<Arc<InMemoryReviewStore>> {
    let path = common::reviews_snapshot_path();
    let store = InMemoryReviewStore::with_snapshot(path.clone())
        .with_context(|| format!("failed to open review store at {}", path.display()))?;
    debug!("review store ready at {}", path.display());
    Ok(Arc::new(store))
}

pub fn embedding_provider() -> Result<Arc<OpenAiEmbeddingProvider>> {
    let config = OpenAiConfig::from_env().context("embedding provider is not configured")?;
    Ok(Arc::new(OpenAiEmbeddingProvider::new(config)?))
}

/// Builds the completion provider together with the pipeline settings
/// derived from the same environment (token cap and temperature).
pub fn completion_provider() -> Result<(Arc<AnthropicProvider>, ReviewConfig)> {
    let config = ClaudeConfig::from_env().context("completion provider is not configured")?;
    let review_config = ReviewConfig {
        max_tokens: config.max_tokens,
        temperature: config.temperature,
        ..ReviewConfig::default()
    };
    Ok((Arc::new(AnthropicProvider::new(config)?), review_config))
}
