//! Review history, retrieval by ID and the feedback loop against the
//! real review store.

use std::sync::Arc;
use std::time::Duration;

use application::dtos::{ListReviewsRequest, ReviewCodeRequest, UpdateFeedbackRequest};
use application::ports::{MockCompletionProvider, MockEmbeddingProvider};
use application::use_cases::{
    GetReviewUseCase, ListReviewsUseCase, ReviewCodeUseCase, ReviewCodeUseCaseImpl, ReviewConfig,
    UpdateFeedbackUseCase,
};
use application::ApplicationError;
use domain::Review;
use kaizen_e2e::REVIEW_MARKDOWN;
use store::{InMemoryKnowledgeStore, InMemoryReviewStore};

async fn reviewed(reviews: &Arc<InMemoryReviewStore>, owner: &str, language: &str) -> Review {
    let use_case = ReviewCodeUseCaseImpl::new(
        Arc::new(MockEmbeddingProvider::new(4)),
        Arc::new(MockCompletionProvider::new().with_markdown(REVIEW_MARKDOWN)),
        Arc::new(InMemoryKnowledgeStore::new()),
        reviews.clone(),
        ReviewConfig::default(),
    );
    use_case
        .review_code(ReviewCodeRequest {
            owner_id: owner.to_string(),
            code: "fn main() {}".to_string(),
            language: language.to_string(),
            context: None,
        })
        .await
        .unwrap()
        .review
}

fn list_request(owner: &str) -> ListReviewsRequest {
    ListReviewsRequest {
        owner_id: owner.to_string(),
        page: None,
        page_size: None,
        language: None,
        created_from: None,
        created_to: None,
        sort_by: None,
    }
}

#[tokio::test]
async fn history_shows_newest_first_and_filters_by_language() {
    let reviews = Arc::new(InMemoryReviewStore::new());
    reviewed(&reviews, "alice", "Rust").await;
    tokio::time::sleep(Duration::from_millis(2)).await;
    reviewed(&reviews, "alice", "Go").await;
    tokio::time::sleep(Duration::from_millis(2)).await;
    reviewed(&reviews, "alice", "Rust").await;

    let list = ListReviewsUseCase::new(reviews.clone());
    let page = list.execute(list_request("alice")).await.unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.total_pages, 1);
    let languages: Vec<&str> = page.items.iter().map(|r| r.language()).collect();
    assert_eq!(languages, ["Rust", "Go", "Rust"]);
    assert!(page.items[0].created_at() > page.items[2].created_at());

    let mut only_go = list_request("alice");
    only_go.language = Some("Go".to_string());
    let page = list.execute(only_go).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].language(), "Go");
}

#[tokio::test]
async fn show_returns_the_full_stored_review() {
    let reviews = Arc::new(InMemoryReviewStore::new());
    let created = reviewed(&reviews, "alice", "Python").await;

    let shown = GetReviewUseCase::new(reviews)
        .execute("alice", created.id())
        .await
        .unwrap();
    assert_eq!(shown.raw_markdown(), REVIEW_MARKDOWN);
    assert!(shown.structured().is_some());
    assert!(!shown.has_feedback());
}

#[tokio::test]
async fn feedback_round_trip() {
    let reviews = Arc::new(InMemoryReviewStore::new());
    let created = reviewed(&reviews, "alice", "Python").await;

    let updated = UpdateFeedbackUseCase::new(reviews.clone())
        .execute(UpdateFeedbackRequest {
            owner_id: "alice".to_string(),
            review_id: created.id(),
            score: 3,
            comment: Some("指摘が的確でした".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(updated.feedback_score(), Some(3));

    let shown = GetReviewUseCase::new(reviews)
        .execute("alice", created.id())
        .await
        .unwrap();
    assert!(shown.has_feedback());
    assert_eq!(shown.feedback_score(), Some(3));
    assert_eq!(shown.feedback_comment(), Some("指摘が的確でした"));
}

#[tokio::test]
async fn owners_cannot_see_each_other() {
    let reviews = Arc::new(InMemoryReviewStore::new());
    let created = reviewed(&reviews, "alice", "Python").await;

    let page = ListReviewsUseCase::new(reviews.clone())
        .execute(list_request("bob"))
        .await
        .unwrap();
    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 0);

    let err = GetReviewUseCase::new(reviews.clone())
        .execute("bob", created.id())
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::AccessDenied { .. }));

    let err = UpdateFeedbackUseCase::new(reviews)
        .execute(UpdateFeedbackRequest {
            owner_id: "bob".to_string(),
            review_id: created.id(),
            score: 1,
            comment: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::AccessDenied { .. }));
}
