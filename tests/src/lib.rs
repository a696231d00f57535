//! Shared fixtures for the end-to-end tests: deterministic embedding
//! vectors, a well-formed model response and knowledge seeding against
//! the real stores.

use domain::{Category, Knowledge};

/// A complete review response in the format the prompt asks for.
pub const REVIEW_MARKDOWN: &str = "### 良い点\n\
- 関数の責務が明確\n\
- 変数名が読みやすい\n\
\n\
### 1. エラーハンドリングの追加\n\
\n\
- 例外が握り潰されている\n\
\n\
改善例：\n\
```python\ntry:\n    run()\nexcept ValueError:\n    raise\n```\n\
\n\
### 総合評価\n\
堅実な実装ですが、エラー処理に改善の余地があります。";

/// Unit vector along `index`, for exact-cosine retrieval scripting.
pub fn axis(dimensions: usize, index: usize) -> Vec<f32> {
    let mut v = vec![0.0; dimensions];
    v[index] = 1.0;
    v
}

/// Knowledge item with an optional pre-computed embedding.
pub fn item(
    owner: &str,
    title: &str,
    category: Category,
    priority: u8,
    embedding: Option<Vec<f32>>,
) -> Knowledge {
    let mut knowledge =
        Knowledge::new(owner, title, "内容の説明", category, priority).expect("valid fixture");
    if let Some(vector) = embedding {
        knowledge.set_embedding(vector);
    }
    knowledge
}
