//! Review history use cases: lookup, paginated listing and feedback.

use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use domain::Review;

use crate::dtos::{ListReviewsRequest, ListReviewsResponse, UpdateFeedbackRequest};
use crate::ports::{ReviewListFilter, ReviewRepository, ReviewSortKey};
use crate::{is_supported_language, ApplicationError, ApplicationResult};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

pub struct GetReviewUseCase {
    review_repository: Arc<dyn ReviewRepository>,
}

impl GetReviewUseCase {
    pub fn new(review_repository: Arc<dyn ReviewRepository>) -> Self {
        Self { review_repository }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, owner_id: &str, review_id: Uuid) -> ApplicationResult<Review> {
        let review = self
            .review_repository
            .find_by_id(review_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Review", review_id.to_string()))?;
        if review.owner_id() != owner_id {
            return Err(ApplicationError::access_denied(
                "Review belongs to a different owner",
            ));
        }
        Ok(review)
    }
}

pub struct ListReviewsUseCase {
    review_repository: Arc<dyn ReviewRepository>,
}

impl ListReviewsUseCase {
    pub fn new(review_repository: Arc<dyn ReviewRepository>) -> Self {
        Self { review_repository }
    }

    #[instrument(skip(self, request), fields(owner_id = %request.owner_id))]
    pub async fn execute(&self, request: ListReviewsRequest) -> ApplicationResult<ListReviewsResponse> {
        if request.owner_id.is_empty() {
            return Err(ApplicationError::validation("Owner ID cannot be empty"));
        }

        let page = request.page.unwrap_or(1);
        if page == 0 {
            return Err(ApplicationError::validation("Page numbers start at 1"));
        }
        let page_size = request.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ApplicationError::validation(format!(
                "Page size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        if let Some(language) = &request.language {
            if !is_supported_language(language) {
                return Err(ApplicationError::validation(format!(
                    "Unsupported language filter: {language}"
                )));
            }
        }
        if let (Some(from), Some(to)) = (request.created_from, request.created_to) {
            if from > to {
                return Err(ApplicationError::validation(
                    "Date range start must not be after its end",
                ));
            }
        }

        let sort = match request.sort_by.as_deref() {
            None | Some("created_at") => ReviewSortKey::CreatedAt,
            Some("language") => ReviewSortKey::Language,
            Some(other) => {
                return Err(ApplicationError::validation(format!(
                    "Unknown sort key: {other} (expected created_at or language)"
                )))
            }
        };

        let filter = ReviewListFilter {
            language: request.language,
            created_from: request.created_from,
            created_to: request.created_to,
            sort,
        };
        let (items, total) = self
            .review_repository
            .list(&request.owner_id, &filter, page, page_size)
            .await?;
        let total_pages = ((total + page_size as usize - 1) / page_size as usize) as u32;

        Ok(ListReviewsResponse {
            items,
            total,
            page,
            page_size,
            total_pages,
        })
    }
}

pub struct UpdateFeedbackUseCase {
    review_repository: Arc<dyn ReviewRepository>,
}

impl UpdateFeedbackUseCase {
    pub fn new(review_repository: Arc<dyn ReviewRepository>) -> Self {
        Self { review_repository }
    }

    #[instrument(skip(self, request), fields(review_id = %request.review_id))]
    pub async fn execute(&self, request: UpdateFeedbackRequest) -> ApplicationResult<Review> {
        let mut review = self
            .review_repository
            .find_by_id(request.review_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Review", request.review_id.to_string()))?;
        if review.owner_id() != request.owner_id {
            return Err(ApplicationError::access_denied(
                "Review belongs to a different owner",
            ));
        }

        review.set_feedback(request.score, request.comment.as_deref().unwrap_or(""))?;
        self.review_repository.update(&review).await?;
        info!(review_id = %review.id(), score = request.score, "feedback recorded");
        Ok(review)
    }
}
