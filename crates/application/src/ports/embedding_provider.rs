//! Embedding generation port.

use async_trait::async_trait;

use crate::ApplicationResult;

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> ApplicationResult<Vec<f32>>;

    /// Generate embeddings for a batch of texts, one vector per input,
    /// in input order.
    async fn embed_batch(&self, texts: &[String]) -> ApplicationResult<Vec<Vec<f32>>>;

    /// Model name reported by the provider.
    fn model_identifier(&self) -> &str;

    /// Vector width produced by this provider.
    fn dimensions(&self) -> usize;
}

/// Scripted embedding provider for tests. Responses are consumed in
/// order; once exhausted, a constant vector is returned.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockEmbeddingProvider {
    dimensions: usize,
    model_name: String,
    responses: std::sync::Mutex<std::collections::VecDeque<ApplicationResult<Vec<f32>>>>,
    always_fail: bool,
    call_count: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockEmbeddingProvider {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            model_name: "mock-embedding-model".to_string(),
            responses: std::sync::Mutex::new(std::collections::VecDeque::new()),
            always_fail: false,
            call_count: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn with_responses(self, responses: Vec<ApplicationResult<Vec<f32>>>) -> Self {
        *self.responses.lock().unwrap() = responses.into();
        self
    }

    /// Provider that fails every call, for fallback-path tests.
    pub fn failing() -> Self {
        let mut provider = Self::new(0);
        provider.always_fail = true;
        provider
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(std::sync::atomic::Ordering::Relaxed)
    }

    fn next_response(&self) -> ApplicationResult<Vec<f32>> {
        self.call_count
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        if self.always_fail {
            return Err(crate::ApplicationError::external_service(
                "mock-embeddings",
                "scripted failure",
            ));
        }
        match self.responses.lock().unwrap().pop_front() {
            Some(response) => response,
            None => Ok(vec![0.1; self.dimensions]),
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, _text: &str) -> ApplicationResult<Vec<f32>> {
        self.next_response()
    }

    async fn embed_batch(&self, texts: &[String]) -> ApplicationResult<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for _ in texts {
            results.push(self.next_response()?);
        }
        Ok(results)
    }

    fn model_identifier(&self) -> &str {
        &self.model_name
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
