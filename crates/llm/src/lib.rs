//! HTTP clients for the external model APIs.
//!
//! Implements the application's completion and embedding ports against
//! Claude (reviews) and OpenAI (embeddings). Both clients take their
//! settings from [`config`] and honor a `base_url` override so tests
//! can point them at a local mock server.

pub mod config;
pub mod providers;

pub use config::{ClaudeConfig, OpenAiConfig};
pub use providers::{AnthropicProvider, OpenAiEmbeddingProvider};
