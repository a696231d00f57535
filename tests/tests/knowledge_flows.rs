//! Knowledge CRUD, stats and backfill wired to the real store,
//! including snapshot persistence across a reopen.

use std::sync::Arc;

use application::dtos::{CreateKnowledgeRequest, ListKnowledgeRequest, UpdateKnowledgeRequest};
use application::ports::{KnowledgeRepository, MockEmbeddingProvider};
use application::use_cases::{
    BackfillEmbeddingsUseCase, CreateKnowledgeUseCase, DeleteKnowledgeUseCase,
    KnowledgeStatsUseCase, ListKnowledgeUseCase, UpdateKnowledgeUseCase,
};
use domain::Category;
use kaizen_e2e::{axis, item};
use store::InMemoryKnowledgeStore;

const DIMS: usize = 4;

fn create_request(owner: &str, title: &str, category: Category, priority: u8) -> CreateKnowledgeRequest {
    CreateKnowledgeRequest {
        owner_id: owner.to_string(),
        title: title.to_string(),
        content: "内容の説明".to_string(),
        category,
        priority,
    }
}

#[tokio::test]
async fn create_then_list_and_stats() {
    let store = Arc::new(InMemoryKnowledgeStore::new());
    let create = CreateKnowledgeUseCase::new(store.clone(), Arc::new(MockEmbeddingProvider::new(DIMS)));

    create
        .execute(create_request("alice", "例外を握り潰さない", Category::ErrorHandling, 5))
        .await
        .unwrap();
    create
        .execute(create_request("alice", "N+1クエリを避ける", Category::Performance, 3))
        .await
        .unwrap();
    create
        .execute(create_request("bob", "別オーナーのルール", Category::Other, 3))
        .await
        .unwrap();

    let list = ListKnowledgeUseCase::new(store.clone());
    let all = list
        .execute(ListKnowledgeRequest {
            owner_id: "alice".to_string(),
            category: None,
        })
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    // Priority descending.
    assert_eq!(all[0].title(), "例外を握り潰さない");
    assert!(all.iter().all(|k| k.has_embedding()));

    let filtered = list
        .execute(ListKnowledgeRequest {
            owner_id: "alice".to_string(),
            category: Some(Category::Performance),
        })
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].title(), "N+1クエリを避ける");

    let stats = KnowledgeStatsUseCase::new(store)
        .execute("alice")
        .await
        .unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.by_category.len(), 2);
    assert!(stats
        .by_category
        .iter()
        .any(|c| c.category == Category::ErrorHandling && c.count == 1));
}

#[tokio::test]
async fn update_merges_fields_and_replaces_embedding() {
    let store = Arc::new(InMemoryKnowledgeStore::new());
    let create = CreateKnowledgeUseCase::new(
        store.clone(),
        Arc::new(MockEmbeddingProvider::new(DIMS).with_responses(vec![Ok(axis(DIMS, 0))])),
    );
    let created = create
        .execute(create_request("alice", "旧タイトル", Category::CleanCode, 2))
        .await
        .unwrap();

    let update = UpdateKnowledgeUseCase::new(
        store.clone(),
        Arc::new(MockEmbeddingProvider::new(DIMS).with_responses(vec![Ok(axis(DIMS, 3))])),
    );
    let updated = update
        .execute(UpdateKnowledgeRequest {
            owner_id: "alice".to_string(),
            knowledge_id: created.id(),
            title: Some("新タイトル".to_string()),
            content: None,
            category: None,
            priority: Some(5),
        })
        .await
        .unwrap();

    assert_eq!(updated.title(), "新タイトル");
    assert_eq!(updated.priority(), 5);
    // Unspecified fields kept their values.
    assert_eq!(updated.category(), Category::CleanCode);
    assert_eq!(updated.content(), "内容の説明");

    let stored = store.find_by_id(created.id()).await.unwrap().unwrap();
    assert_eq!(stored.embedding(), Some(axis(DIMS, 3).as_slice()));
}

#[tokio::test]
async fn delete_hides_item_from_every_read() {
    let store = Arc::new(InMemoryKnowledgeStore::new());
    let create = CreateKnowledgeUseCase::new(
        store.clone(),
        Arc::new(MockEmbeddingProvider::new(DIMS).with_responses(vec![Ok(axis(DIMS, 0))])),
    );
    let created = create
        .execute(create_request("alice", "消えるルール", Category::Other, 3))
        .await
        .unwrap();

    DeleteKnowledgeUseCase::new(store.clone())
        .execute("alice", created.id())
        .await
        .unwrap();

    assert!(store.find_by_id(created.id()).await.unwrap().is_none());
    assert!(store.find_all_active("alice").await.unwrap().is_empty());
    let hits = store
        .search_by_similarity("alice", &axis(DIMS, 0), 10, 0.1)
        .await
        .unwrap();
    assert!(hits.is_empty());
    assert_eq!(store.count_active("alice").await.unwrap(), 0);
}

#[tokio::test]
async fn backfill_embeds_items_missing_vectors() {
    let store = Arc::new(InMemoryKnowledgeStore::new());
    for title in ["ルール一", "ルール二", "ルール三"] {
        store
            .save(&item("alice", title, Category::Other, 3, None))
            .await
            .unwrap();
    }
    store
        .save(&item("alice", "既に埋め込み済み", Category::Other, 3, Some(axis(DIMS, 0))))
        .await
        .unwrap();

    let backfill = BackfillEmbeddingsUseCase::new(
        store.clone(),
        Arc::new(MockEmbeddingProvider::new(DIMS)),
    );
    let outcome = backfill.execute(None).await.unwrap();

    assert_eq!(outcome.candidates, 3);
    assert_eq!(outcome.embedded, 3);
    assert!(outcome.failures.is_empty());
    let remaining = store.find_without_embedding(None).await.unwrap();
    assert!(remaining.is_empty());

    // Second run has nothing to do.
    let outcome = backfill.execute(None).await.unwrap();
    assert_eq!(outcome.candidates, 0);
    assert_eq!(outcome.embedded, 0);
}

#[tokio::test]
async fn snapshot_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("knowledge.json");

    let created = {
        let store = Arc::new(InMemoryKnowledgeStore::with_snapshot(path.clone()).unwrap());
        let create = CreateKnowledgeUseCase::new(
            store.clone(),
            Arc::new(MockEmbeddingProvider::new(DIMS).with_responses(vec![Ok(axis(DIMS, 2))])),
        );
        create
            .execute(create_request("alice", "永続化されるルール", Category::Security, 4))
            .await
            .unwrap()
    };

    let reopened = Arc::new(InMemoryKnowledgeStore::with_snapshot(path).unwrap());
    let stored = reopened.find_by_id(created.id()).await.unwrap().unwrap();
    assert_eq!(stored.title(), "永続化されるルール");
    assert_eq!(stored.embedding(), Some(axis(DIMS, 2).as_slice()));
    assert_eq!(stored.usage_count(), 0);
}
