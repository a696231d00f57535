//! In-memory repository implementations behind the application ports.
//!
//! Both stores hold entities in a `HashMap` under an async `RwLock` and
//! can optionally mirror their contents to a JSON snapshot file, written
//! atomically so a crash never corrupts the history.

pub mod knowledge_store;
pub mod review_store;
pub mod similarity;
pub mod snapshot;

pub use knowledge_store::InMemoryKnowledgeStore;
pub use review_store::InMemoryReviewStore;
pub use similarity::cosine_similarity;
