//! Text completion port for review generation.

use async_trait::async_trait;

use crate::ApplicationResult;

/// One completion call. `system` carries the review instructions and
/// knowledge block, `user` the code under review.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Completion output plus the provenance recorded on the review.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub text: String,
    /// Input + output tokens as reported by the provider.
    pub tokens_used: u32,
    pub provider: String,
    pub model: String,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> ApplicationResult<CompletionResponse>;
}

/// Scripted completion provider for tests.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockCompletionProvider {
    responses: std::sync::Mutex<std::collections::VecDeque<ApplicationResult<CompletionResponse>>>,
    last_request: std::sync::Mutex<Option<CompletionRequest>>,
    call_count: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockCompletionProvider {
    pub fn new() -> Self {
        Self {
            responses: std::sync::Mutex::new(std::collections::VecDeque::new()),
            last_request: std::sync::Mutex::new(None),
            call_count: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Script a single successful response with the given markdown.
    pub fn with_markdown(self, markdown: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(CompletionResponse {
                text: markdown.to_string(),
                tokens_used: 128,
                provider: "mock".to_string(),
                model: "mock-model".to_string(),
            }));
        self
    }

    pub fn with_error(self, error: crate::ApplicationError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(std::sync::atomic::Ordering::Relaxed)
    }

    /// The request captured by the most recent `complete` call.
    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Default for MockCompletionProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl CompletionProvider for MockCompletionProvider {
    async fn complete(&self, request: CompletionRequest) -> ApplicationResult<CompletionResponse> {
        self.call_count
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request);
        match self.responses.lock().unwrap().pop_front() {
            Some(response) => response,
            None => Ok(CompletionResponse {
                text: "### 総合評価\n特に問題は見つかりませんでした。".to_string(),
                tokens_used: 16,
                provider: "mock".to_string(),
                model: "mock-model".to_string(),
            }),
        }
    }
}
