//! The review pipeline against real in-memory stores: retrieval by
//! cosine similarity, prompt assembly, persistence and usage tracking.

use std::sync::Arc;

use application::dtos::ReviewCodeRequest;
use application::ports::{
    KnowledgeRepository, MockCompletionProvider, MockEmbeddingProvider, ReviewRepository,
};
use application::use_cases::{ReviewCodeUseCase, ReviewCodeUseCaseImpl, ReviewConfig};
use application::ApplicationError;
use domain::{Category, Severity};
use kaizen_e2e::{axis, item, REVIEW_MARKDOWN};
use store::{InMemoryKnowledgeStore, InMemoryReviewStore};

const DIMS: usize = 4;

fn request(owner: &str) -> ReviewCodeRequest {
    ReviewCodeRequest {
        owner_id: owner.to_string(),
        code: "def run():\n    pass\n".to_string(),
        language: "Python".to_string(),
        context: Some("バッチ処理の入口です".to_string()),
    }
}

fn pipeline(
    embedding: MockEmbeddingProvider,
    completion: MockCompletionProvider,
    knowledge: Arc<InMemoryKnowledgeStore>,
    reviews: Arc<InMemoryReviewStore>,
) -> ReviewCodeUseCaseImpl {
    ReviewCodeUseCaseImpl::new(
        Arc::new(embedding),
        Arc::new(completion),
        knowledge,
        reviews,
        ReviewConfig::default(),
    )
}

#[tokio::test]
async fn full_pipeline_persists_review_and_tracks_usage() {
    let knowledge = Arc::new(InMemoryKnowledgeStore::new());
    let reviews = Arc::new(InMemoryReviewStore::new());

    let matching = item(
        "alice",
        "例外は握り潰さない",
        Category::ErrorHandling,
        5,
        Some(axis(DIMS, 0)),
    );
    let unrelated = item(
        "alice",
        "テストを書く",
        Category::Testing,
        3,
        Some(axis(DIMS, 1)),
    );
    knowledge.save(&matching).await.unwrap();
    knowledge.save(&unrelated).await.unwrap();

    // Query vector nearly parallel to `matching`, nearly orthogonal to
    // `unrelated` (cosine ~0.98 vs ~0.20 against the 0.35 floor).
    let embedding =
        MockEmbeddingProvider::new(DIMS).with_responses(vec![Ok(vec![1.0, 0.2, 0.0, 0.0])]);
    let completion = MockCompletionProvider::new().with_markdown(REVIEW_MARKDOWN);

    let use_case = pipeline(embedding, completion, knowledge.clone(), reviews.clone());
    let response = use_case.review_code(request("alice")).await.unwrap();

    assert!(!response.used_fallback);
    let review = &response.review;
    assert_eq!(review.referenced_knowledge(), &[matching.id()]);
    assert_eq!(review.llm_provider(), "mock");
    assert_eq!(review.tokens_used(), 128);

    let structured = review.structured().expect("parsed result");
    assert_eq!(structured.improvements.len(), 1);
    assert_eq!(structured.improvements[0].severity, Severity::High);
    assert_eq!(
        structured.summary,
        "堅実な実装ですが、エラー処理に改善の余地があります。"
    );

    // Durable and readable back.
    let stored = reviews.find_by_id(review.id()).await.unwrap().unwrap();
    assert_eq!(stored.raw_markdown(), REVIEW_MARKDOWN);

    // Only the consumed item's usage moved.
    let matched = knowledge.find_by_id(matching.id()).await.unwrap().unwrap();
    assert_eq!(matched.usage_count(), 1);
    assert!(matched.last_used_at().is_some());
    let untouched = knowledge.find_by_id(unrelated.id()).await.unwrap().unwrap();
    assert_eq!(untouched.usage_count(), 0);
}

#[tokio::test]
async fn prompt_carries_only_retrieved_knowledge() {
    let knowledge = Arc::new(InMemoryKnowledgeStore::new());
    let reviews = Arc::new(InMemoryReviewStore::new());

    let matching = item(
        "alice",
        "SQLは必ずプレースホルダ",
        Category::Security,
        5,
        Some(axis(DIMS, 0)),
    );
    let unrelated = item(
        "alice",
        "マジックナンバー禁止",
        Category::CleanCode,
        5,
        Some(axis(DIMS, 1)),
    );
    knowledge.save(&matching).await.unwrap();
    knowledge.save(&unrelated).await.unwrap();

    let embedding = MockEmbeddingProvider::new(DIMS).with_responses(vec![Ok(axis(DIMS, 0))]);
    let completion = MockCompletionProvider::new().with_markdown(REVIEW_MARKDOWN);
    let completion = Arc::new(completion);

    let use_case = ReviewCodeUseCaseImpl::new(
        Arc::new(embedding),
        completion.clone(),
        knowledge,
        reviews,
        ReviewConfig::default(),
    );
    use_case.review_code(request("alice")).await.unwrap();

    let sent = completion.last_request().expect("completion called");
    assert!(sent.system.contains("SQLは必ずプレースホルダ"));
    assert!(!sent.system.contains("マジックナンバー禁止"));
    assert!(sent.user.contains("def run():"));
    assert!(sent.user.contains("バッチ処理の入口です"));
}

#[tokio::test]
async fn embedding_failure_falls_back_to_all_active_knowledge() {
    let knowledge = Arc::new(InMemoryKnowledgeStore::new());
    let reviews = Arc::new(InMemoryReviewStore::new());

    let with_vector = item(
        "alice",
        "エラーは文脈付きで返す",
        Category::ErrorHandling,
        4,
        Some(axis(DIMS, 2)),
    );
    let without_vector = item("alice", "早期リターンを好む", Category::CleanCode, 2, None);
    let mut deleted = item("alice", "削除済みルール", Category::Other, 5, None);
    deleted.soft_delete();
    knowledge.save(&with_vector).await.unwrap();
    knowledge.save(&without_vector).await.unwrap();
    knowledge.save(&deleted).await.unwrap();

    let use_case = pipeline(
        MockEmbeddingProvider::failing(),
        MockCompletionProvider::new().with_markdown(REVIEW_MARKDOWN),
        knowledge.clone(),
        reviews,
    );
    let response = use_case.review_code(request("alice")).await.unwrap();

    assert!(response.used_fallback);
    // Both active items enter the prompt, higher priority first; the
    // deleted one stays invisible.
    assert_eq!(
        response.review.referenced_knowledge(),
        &[with_vector.id(), without_vector.id()]
    );

    for id in [with_vector.id(), without_vector.id()] {
        let stored = knowledge.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored.usage_count(), 1);
    }
}

#[tokio::test]
async fn below_threshold_knowledge_leaves_review_ungrounded() {
    let knowledge = Arc::new(InMemoryKnowledgeStore::new());
    let reviews = Arc::new(InMemoryReviewStore::new());

    let far = item(
        "alice",
        "非同期はタイムアウト必須",
        Category::Architecture,
        4,
        Some(axis(DIMS, 1)),
    );
    knowledge.save(&far).await.unwrap();

    // cosine 0.2, below the retrieval floor.
    let embedding =
        MockEmbeddingProvider::new(DIMS).with_responses(vec![Ok(vec![1.0, 0.2, 0.0, 0.0])]);
    let use_case = pipeline(
        embedding,
        MockCompletionProvider::new().with_markdown(REVIEW_MARKDOWN),
        knowledge.clone(),
        reviews.clone(),
    );
    let response = use_case.review_code(request("alice")).await.unwrap();

    assert!(!response.used_fallback);
    assert!(response.review.referenced_knowledge().is_empty());
    let stored = knowledge.find_by_id(far.id()).await.unwrap().unwrap();
    assert_eq!(stored.usage_count(), 0);
    // The review itself still went through.
    assert!(reviews
        .find_by_id(response.review.id())
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn unsupported_language_is_rejected_before_any_provider_call() {
    let knowledge = Arc::new(InMemoryKnowledgeStore::new());
    let reviews = Arc::new(InMemoryReviewStore::new());

    let embedding = MockEmbeddingProvider::new(DIMS);
    let use_case = pipeline(
        embedding,
        MockCompletionProvider::new(),
        knowledge,
        reviews.clone(),
    );

    let mut bad = request("alice");
    bad.language = "COBOL".to_string();
    let err = use_case.review_code(bad).await.unwrap_err();
    assert!(matches!(err, ApplicationError::Validation { .. }));

    let (_, total) = reviews
        .list("alice", &Default::default(), 1, 10)
        .await
        .unwrap();
    assert_eq!(total, 0);
}

#[tokio::test]
async fn completion_failure_persists_nothing() {
    let knowledge = Arc::new(InMemoryKnowledgeStore::new());
    let reviews = Arc::new(InMemoryReviewStore::new());

    let rule = item(
        "alice",
        "ログは構造化する",
        Category::Other,
        3,
        Some(axis(DIMS, 0)),
    );
    knowledge.save(&rule).await.unwrap();

    let embedding = MockEmbeddingProvider::new(DIMS).with_responses(vec![Ok(axis(DIMS, 0))]);
    let completion = MockCompletionProvider::new()
        .with_error(ApplicationError::external_service("claude", "overloaded"));

    let use_case = pipeline(embedding, completion, knowledge.clone(), reviews.clone());
    let err = use_case.review_code(request("alice")).await.unwrap_err();
    assert!(matches!(err, ApplicationError::ExternalService { .. }));

    let (_, total) = reviews
        .list("alice", &Default::default(), 1, 10)
        .await
        .unwrap();
    assert_eq!(total, 0);
    // No review, no usage tracking.
    let stored = knowledge.find_by_id(rule.id()).await.unwrap().unwrap();
    assert_eq!(stored.usage_count(), 0);
}
