//! In-memory review history store.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use application::ports::{ReviewListFilter, ReviewRepository, ReviewSortKey};
use application::{ApplicationError, ApplicationResult};
use domain::Review;

use crate::snapshot;

pub struct InMemoryReviewStore {
    reviews: RwLock<HashMap<Uuid, Review>>,
    snapshot_path: Option<PathBuf>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self {
            reviews: RwLock::new(HashMap::new()),
            snapshot_path: None,
        }
    }

    /// Store backed by a JSON snapshot: loaded now, rewritten after
    /// every mutation.
    pub fn with_snapshot(path: PathBuf) -> ApplicationResult<Self> {
        let records: Vec<Review> = snapshot::load(&path)?;
        let reviews = records.into_iter().map(|r| (r.id(), r)).collect();
        Ok(Self {
            reviews: RwLock::new(reviews),
            snapshot_path: Some(path),
        })
    }

    fn persist(&self, reviews: &HashMap<Uuid, Review>) -> ApplicationResult<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        let mut records: Vec<&Review> = reviews.values().collect();
        records.sort_by_key(|r| r.id());
        snapshot::write(path, &records)
    }
}

impl Default for InMemoryReviewStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewStore {
    async fn save(&self, review: &Review) -> ApplicationResult<()> {
        let mut reviews = self.reviews.write().await;
        reviews.insert(review.id(), review.clone());
        self.persist(&reviews)
    }

    async fn find_by_id(&self, id: Uuid) -> ApplicationResult<Option<Review>> {
        let reviews = self.reviews.read().await;
        Ok(reviews.get(&id).filter(|r| !r.is_deleted()).cloned())
    }

    async fn list(
        &self,
        owner_id: &str,
        filter: &ReviewListFilter,
        page: u32,
        page_size: u32,
    ) -> ApplicationResult<(Vec<Review>, usize)> {
        let reviews = self.reviews.read().await;
        let mut matching: Vec<&Review> = reviews
            .values()
            .filter(|r| r.owner_id() == owner_id && !r.is_deleted())
            .filter(|r| {
                filter
                    .language
                    .as_deref()
                    .map_or(true, |language| r.language() == language)
            })
            .filter(|r| filter.created_from.map_or(true, |from| r.created_at() >= from))
            .filter(|r| filter.created_to.map_or(true, |to| r.created_at() <= to))
            .collect();

        match filter.sort {
            ReviewSortKey::CreatedAt => {
                matching.sort_by(|a, b| b.created_at().cmp(&a.created_at()))
            }
            ReviewSortKey::Language => matching.sort_by(|a, b| {
                a.language()
                    .cmp(b.language())
                    .then_with(|| b.created_at().cmp(&a.created_at()))
            }),
        }

        let total = matching.len();
        let start = (page.saturating_sub(1) as usize) * page_size as usize;
        let items = matching
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .cloned()
            .collect();
        Ok((items, total))
    }

    async fn update(&self, review: &Review) -> ApplicationResult<()> {
        let mut reviews = self.reviews.write().await;
        match reviews.get_mut(&review.id()) {
            Some(slot) => *slot = review.clone(),
            None => {
                return Err(ApplicationError::not_found(
                    "Review",
                    review.id().to_string(),
                ))
            }
        }
        self.persist(&reviews)
    }
}
