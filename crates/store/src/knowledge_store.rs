//! In-memory knowledge store with cosine retrieval.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use application::ports::KnowledgeRepository;
use application::{ApplicationError, ApplicationResult};
use domain::{Category, Knowledge};

use crate::similarity::cosine_similarity;
use crate::snapshot;

pub struct InMemoryKnowledgeStore {
    items: RwLock<HashMap<Uuid, Knowledge>>,
    snapshot_path: Option<PathBuf>,
}

impl InMemoryKnowledgeStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            snapshot_path: None,
        }
    }

    /// Store backed by a JSON snapshot: loaded now, rewritten after
    /// every mutation.
    pub fn with_snapshot(path: PathBuf) -> ApplicationResult<Self> {
        let records: Vec<Knowledge> = snapshot::load(&path)?;
        let items = records.into_iter().map(|k| (k.id(), k)).collect();
        Ok(Self {
            items: RwLock::new(items),
            snapshot_path: Some(path),
        })
    }

    fn persist(&self, items: &HashMap<Uuid, Knowledge>) -> ApplicationResult<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        // Sorted for stable snapshot diffs.
        let mut records: Vec<&Knowledge> = items.values().collect();
        records.sort_by_key(|k| k.id());
        snapshot::write(path, &records)
    }

    fn active_for<'a>(items: &'a HashMap<Uuid, Knowledge>, owner_id: &str) -> Vec<&'a Knowledge> {
        let mut active: Vec<&Knowledge> = items
            .values()
            .filter(|k| k.owner_id() == owner_id && k.is_active() && k.deleted_at().is_none())
            .collect();
        active.sort_by(|a, b| {
            b.priority()
                .cmp(&a.priority())
                .then_with(|| b.created_at().cmp(&a.created_at()))
        });
        active
    }
}

impl Default for InMemoryKnowledgeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KnowledgeRepository for InMemoryKnowledgeStore {
    async fn save(&self, knowledge: &Knowledge) -> ApplicationResult<()> {
        let mut items = self.items.write().await;
        items.insert(knowledge.id(), knowledge.clone());
        self.persist(&items)
    }

    async fn find_by_id(&self, id: Uuid) -> ApplicationResult<Option<Knowledge>> {
        let items = self.items.read().await;
        Ok(items
            .get(&id)
            .filter(|k| k.deleted_at().is_none())
            .cloned())
    }

    async fn find_all_active(&self, owner_id: &str) -> ApplicationResult<Vec<Knowledge>> {
        let items = self.items.read().await;
        Ok(Self::active_for(&items, owner_id)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn find_by_category(
        &self,
        owner_id: &str,
        category: Category,
    ) -> ApplicationResult<Vec<Knowledge>> {
        let items = self.items.read().await;
        Ok(Self::active_for(&items, owner_id)
            .into_iter()
            .filter(|k| k.category() == category)
            .cloned()
            .collect())
    }

    async fn search_by_similarity(
        &self,
        owner_id: &str,
        embedding: &[f32],
        top_k: usize,
        min_similarity: f32,
    ) -> ApplicationResult<Vec<Knowledge>> {
        let items = self.items.read().await;
        let mut scored: Vec<(f32, &Knowledge)> = items
            .values()
            .filter(|k| k.owner_id() == owner_id && k.is_active() && k.deleted_at().is_none())
            .filter_map(|k| {
                k.embedding()
                    .map(|stored| (cosine_similarity(embedding, stored), k))
            })
            .filter(|(score, _)| *score >= min_similarity)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(_, k)| k.clone())
            .collect())
    }

    async fn find_without_embedding(
        &self,
        limit: Option<usize>,
    ) -> ApplicationResult<Vec<Knowledge>> {
        let items = self.items.read().await;
        let mut missing: Vec<&Knowledge> = items
            .values()
            .filter(|k| k.is_active() && k.deleted_at().is_none() && !k.has_embedding())
            .collect();
        missing.sort_by_key(|k| k.created_at());
        if let Some(limit) = limit {
            missing.truncate(limit);
        }
        Ok(missing.into_iter().cloned().collect())
    }

    async fn update(&self, knowledge: &Knowledge) -> ApplicationResult<()> {
        let mut items = self.items.write().await;
        match items.get_mut(&knowledge.id()) {
            Some(slot) => *slot = knowledge.clone(),
            None => {
                return Err(ApplicationError::not_found(
                    "Knowledge",
                    knowledge.id().to_string(),
                ))
            }
        }
        self.persist(&items)
    }

    async fn soft_delete(&self, id: Uuid) -> ApplicationResult<()> {
        let mut items = self.items.write().await;
        match items.get_mut(&id) {
            Some(item) => item.soft_delete(),
            None => return Err(ApplicationError::not_found("Knowledge", id.to_string())),
        }
        self.persist(&items)
    }

    async fn count_active(&self, owner_id: &str) -> ApplicationResult<usize> {
        let items = self.items.read().await;
        Ok(Self::active_for(&items, owner_id).len())
    }

    async fn count_by_category(
        &self,
        owner_id: &str,
    ) -> ApplicationResult<Vec<(Category, usize)>> {
        let items = self.items.read().await;
        let active = Self::active_for(&items, owner_id);
        let mut counts = Vec::new();
        for category in Category::all() {
            let count = active.iter().filter(|k| k.category() == category).count();
            if count > 0 {
                counts.push((category, count));
            }
        }
        Ok(counts)
    }
}
