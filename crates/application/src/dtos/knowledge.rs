//! Knowledge management DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain::Category;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateKnowledgeRequest {
    pub owner_id: String,
    pub title: String,
    pub content: String,
    pub category: Category,
    pub priority: u8,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateKnowledgeRequest {
    pub owner_id: String,
    pub knowledge_id: Uuid,
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListKnowledgeRequest {
    pub owner_id: String,
    pub category: Option<Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeStatsResponse {
    pub total: usize,
    pub by_category: Vec<CategoryCount>,
}

/// Outcome of an embedding backfill run. Failures carry human-readable
/// messages; the run itself only fails on a store read error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackfillOutcome {
    /// Items found without an embedding.
    pub candidates: usize,
    /// Items embedded and persisted.
    pub embedded: usize,
    pub failures: Vec<String>,
}
