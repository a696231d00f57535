//! Knowledge store port.

use async_trait::async_trait;
use uuid::Uuid;

use domain::{Category, Knowledge};

use crate::ApplicationResult;

/// Persistence operations over knowledge items. Soft-deleted items are
/// invisible to every read except nothing: the port has no way to read
/// them back.
#[async_trait]
pub trait KnowledgeRepository: Send + Sync {
    async fn save(&self, knowledge: &Knowledge) -> ApplicationResult<()>;

    async fn find_by_id(&self, id: Uuid) -> ApplicationResult<Option<Knowledge>>;

    /// Active items for an owner, priority descending then newest first.
    async fn find_all_active(&self, owner_id: &str) -> ApplicationResult<Vec<Knowledge>>;

    async fn find_by_category(
        &self,
        owner_id: &str,
        category: Category,
    ) -> ApplicationResult<Vec<Knowledge>>;

    /// Cosine similarity search over the owner's active items that have
    /// an embedding, best match first. Items below `min_similarity` are
    /// dropped; an empty result is not an error.
    async fn search_by_similarity(
        &self,
        owner_id: &str,
        embedding: &[f32],
        top_k: usize,
        min_similarity: f32,
    ) -> ApplicationResult<Vec<Knowledge>>;

    /// Items missing an embedding, oldest first, across all owners.
    async fn find_without_embedding(&self, limit: Option<usize>)
        -> ApplicationResult<Vec<Knowledge>>;

    async fn update(&self, knowledge: &Knowledge) -> ApplicationResult<()>;

    async fn soft_delete(&self, id: Uuid) -> ApplicationResult<()>;

    async fn count_active(&self, owner_id: &str) -> ApplicationResult<usize>;

    async fn count_by_category(&self, owner_id: &str)
        -> ApplicationResult<Vec<(Category, usize)>>;
}

/// In-memory fake with failure injection for use-case tests. Similarity
/// results are scripted rather than computed; everything else behaves
/// like a real store.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockKnowledgeRepository {
    items: std::sync::Mutex<Vec<Knowledge>>,
    similarity_results: std::sync::Mutex<
        std::collections::VecDeque<ApplicationResult<Vec<Knowledge>>>,
    >,
    fail_updates_for: std::sync::Mutex<Vec<Uuid>>,
    save_count: std::sync::atomic::AtomicUsize,
    update_count: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockKnowledgeRepository {
    pub fn new() -> Self {
        Self {
            items: std::sync::Mutex::new(Vec::new()),
            similarity_results: std::sync::Mutex::new(std::collections::VecDeque::new()),
            fail_updates_for: std::sync::Mutex::new(Vec::new()),
            save_count: std::sync::atomic::AtomicUsize::new(0),
            update_count: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn with_items(self, items: Vec<Knowledge>) -> Self {
        *self.items.lock().unwrap() = items;
        self
    }

    /// Script the result of the next `search_by_similarity` call.
    pub fn with_similarity_result(self, result: ApplicationResult<Vec<Knowledge>>) -> Self {
        self.similarity_results.lock().unwrap().push_back(result);
        self
    }

    /// Make `update` fail for the given item.
    pub fn fail_update_for(&self, id: Uuid) {
        self.fail_updates_for.lock().unwrap().push(id);
    }

    pub fn get(&self, id: Uuid) -> Option<Knowledge> {
        self.items.lock().unwrap().iter().find(|k| k.id() == id).cloned()
    }

    pub fn save_count(&self) -> usize {
        self.save_count.load(std::sync::atomic::Ordering::Relaxed)
    }

    pub fn update_count(&self) -> usize {
        self.update_count.load(std::sync::atomic::Ordering::Relaxed)
    }

    fn active_for<'a>(items: &'a [Knowledge], owner_id: &str) -> Vec<&'a Knowledge> {
        let mut active: Vec<&Knowledge> = items
            .iter()
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

#[cfg(any(test, feature = "test-utils"))]
impl Default for MockKnowledgeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl KnowledgeRepository for MockKnowledgeRepository {
    async fn save(&self, knowledge: &Knowledge) -> ApplicationResult<()> {
        self.save_count
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        self.items.lock().unwrap().push(knowledge.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> ApplicationResult<Option<Knowledge>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|k| k.id() == id && k.deleted_at().is_none())
            .cloned())
    }

    async fn find_all_active(&self, owner_id: &str) -> ApplicationResult<Vec<Knowledge>> {
        let items = self.items.lock().unwrap();
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
        let items = self.items.lock().unwrap();
        Ok(Self::active_for(&items, owner_id)
            .into_iter()
            .filter(|k| k.category() == category)
            .cloned()
            .collect())
    }

    async fn search_by_similarity(
        &self,
        _owner_id: &str,
        _embedding: &[f32],
        top_k: usize,
        _min_similarity: f32,
    ) -> ApplicationResult<Vec<Knowledge>> {
        match self.similarity_results.lock().unwrap().pop_front() {
            Some(result) => result.map(|mut items| {
                items.truncate(top_k);
                items
            }),
            None => Ok(Vec::new()),
        }
    }

    async fn find_without_embedding(
        &self,
        limit: Option<usize>,
    ) -> ApplicationResult<Vec<Knowledge>> {
        let items = self.items.lock().unwrap();
        let mut missing: Vec<&Knowledge> = items
            .iter()
            .filter(|k| k.deleted_at().is_none() && !k.has_embedding())
            .collect();
        missing.sort_by_key(|k| k.created_at());
        if let Some(limit) = limit {
            missing.truncate(limit);
        }
        Ok(missing.into_iter().cloned().collect())
    }

    async fn update(&self, knowledge: &Knowledge) -> ApplicationResult<()> {
        if self
            .fail_updates_for
            .lock()
            .unwrap()
            .contains(&knowledge.id())
        {
            return Err(crate::ApplicationError::storage(format!(
                "scripted update failure for {}",
                knowledge.id()
            )));
        }
        self.update_count
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let mut items = self.items.lock().unwrap();
        match items.iter_mut().find(|k| k.id() == knowledge.id()) {
            Some(slot) => {
                *slot = knowledge.clone();
                Ok(())
            }
            None => Err(crate::ApplicationError::not_found(
                "Knowledge",
                knowledge.id().to_string(),
            )),
        }
    }

    async fn soft_delete(&self, id: Uuid) -> ApplicationResult<()> {
        let mut items = self.items.lock().unwrap();
        match items.iter_mut().find(|k| k.id() == id) {
            Some(item) => {
                item.soft_delete();
                Ok(())
            }
            None => Err(crate::ApplicationError::not_found(
                "Knowledge",
                id.to_string(),
            )),
        }
    }

    async fn count_active(&self, owner_id: &str) -> ApplicationResult<usize> {
        let items = self.items.lock().unwrap();
        Ok(Self::active_for(&items, owner_id).len())
    }

    async fn count_by_category(
        &self,
        owner_id: &str,
    ) -> ApplicationResult<Vec<(Category, usize)>> {
        let items = self.items.lock().unwrap();
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
