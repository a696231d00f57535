pub mod anthropic;
pub mod openai_embeddings;

pub use anthropic::AnthropicProvider;
pub use openai_embeddings::OpenAiEmbeddingProvider;
