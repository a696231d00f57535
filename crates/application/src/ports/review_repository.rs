//! Review store port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use domain::Review;

use crate::ApplicationResult;

/// Sort key for review listings. Creation time sorts newest first,
/// language sorts alphabetically with newest first inside a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewSortKey {
    #[default]
    CreatedAt,
    Language,
}

/// Listing filter. `created_from`/`created_to` are inclusive bounds.
#[derive(Debug, Clone, Default)]
pub struct ReviewListFilter {
    pub language: Option<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub sort: ReviewSortKey,
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn save(&self, review: &Review) -> ApplicationResult<()>;

    async fn find_by_id(&self, id: Uuid) -> ApplicationResult<Option<Review>>;

    /// Page through an owner's reviews. Returns the page plus the total
    /// count matching the filter. `page` is 1-based.
    async fn list(
        &self,
        owner_id: &str,
        filter: &ReviewListFilter,
        page: u32,
        page_size: u32,
    ) -> ApplicationResult<(Vec<Review>, usize)>;

    async fn update(&self, review: &Review) -> ApplicationResult<()>;
}

/// In-memory fake with failure injection for use-case tests.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockReviewRepository {
    reviews: std::sync::Mutex<Vec<Review>>,
    fail_save: std::sync::atomic::AtomicBool,
    save_count: std::sync::atomic::AtomicUsize,
    update_count: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockReviewRepository {
    pub fn new() -> Self {
        Self {
            reviews: std::sync::Mutex::new(Vec::new()),
            fail_save: std::sync::atomic::AtomicBool::new(false),
            save_count: std::sync::atomic::AtomicUsize::new(0),
            update_count: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn with_reviews(self, reviews: Vec<Review>) -> Self {
        *self.reviews.lock().unwrap() = reviews;
        self
    }

    /// Make every subsequent `save` fail.
    pub fn failing_save(self) -> Self {
        self.fail_save
            .store(true, std::sync::atomic::Ordering::Relaxed);
        self
    }

    pub fn get(&self, id: Uuid) -> Option<Review> {
        self.reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }

    pub fn save_count(&self) -> usize {
        self.save_count.load(std::sync::atomic::Ordering::Relaxed)
    }

    pub fn update_count(&self) -> usize {
        self.update_count.load(std::sync::atomic::Ordering::Relaxed)
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for MockReviewRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl ReviewRepository for MockReviewRepository {
    async fn save(&self, review: &Review) -> ApplicationResult<()> {
        if self.fail_save.load(std::sync::atomic::Ordering::Relaxed) {
            return Err(crate::ApplicationError::storage("scripted save failure"));
        }
        self.save_count
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        self.reviews.lock().unwrap().push(review.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> ApplicationResult<Option<Review>> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id() == id && !r.is_deleted())
            .cloned())
    }

    async fn list(
        &self,
        owner_id: &str,
        filter: &ReviewListFilter,
        page: u32,
        page_size: u32,
    ) -> ApplicationResult<(Vec<Review>, usize)> {
        let reviews = self.reviews.lock().unwrap();
        let mut matching: Vec<&Review> = reviews
            .iter()
            .filter(|r| r.owner_id() == owner_id && !r.is_deleted())
            .filter(|r| {
                filter
                    .language
                    .as_deref()
                    .map_or(true, |lang| r.language() == lang)
            })
            .filter(|r| filter.created_from.map_or(true, |from| r.created_at() >= from))
            .filter(|r| filter.created_to.map_or(true, |to| r.created_at() <= to))
            .collect();

        match filter.sort {
            ReviewSortKey::CreatedAt => matching.sort_by(|a, b| b.created_at().cmp(&a.created_at())),
            ReviewSortKey::Language => matching.sort_by(|a, b| {
                a.language()
                    .cmp(b.language())
                    .then_with(|| b.created_at().cmp(&a.created_at()))
            }),
        }

        let total = matching.len();
        let start = ((page - 1) * page_size) as usize;
        let items = matching
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .cloned()
            .collect();
        Ok((items, total))
    }

    async fn update(&self, review: &Review) -> ApplicationResult<()> {
        self.update_count
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let mut reviews = self.reviews.lock().unwrap();
        match reviews.iter_mut().find(|r| r.id() == review.id()) {
            Some(slot) => {
                *slot = review.clone();
                Ok(())
            }
            None => Err(crate::ApplicationError::not_found(
                "Review",
                review.id().to_string(),
            )),
        }
    }
}
