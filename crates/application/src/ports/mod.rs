//! Ports implemented by the infrastructure crates. The application
//! layer only ever talks to these traits; `llm` and `store` provide the
//! concrete implementations.

pub mod completion_provider;
pub mod embedding_provider;
pub mod knowledge_repository;
pub mod review_repository;

pub use completion_provider::*;
pub use embedding_provider::*;
pub use knowledge_repository::*;
pub use review_repository::*;
