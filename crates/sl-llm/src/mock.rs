use async_trait::async_trait;
use parking_lot::Mutex;
use sl_domain::error::{Error, Result};

use crate::provider::LlmProvider;
use crate::types::{ChatRequest, ChatResponse};

/// Scripted `LlmProvider` for agent-loop tests: returns the next queued
/// response on each call, in order, and records every request it saw.
pub struct MockLlmProvider {
    responses: Mutex<Vec<ChatResponse>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockLlmProvider {
    /// Responses are consumed front-to-back, one per `complete` call.
    pub fn new(responses: Vec<ChatResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests_seen(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().push(request);
        let mut responses = self.responses.lock();
        if responses.is_empty() {
            return Err(Error::Llm {
                provider: "mock".into(),
                message: "no more scripted responses".into(),
            });
        }
        Ok(responses.remove(0))
    }

    fn provider_id(&self) -> &str {
        "mock"
    }
}
