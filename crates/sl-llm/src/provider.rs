use async_trait::async_trait;
use sl_domain::error::Result;

use crate::types::{ChatRequest, ChatResponse};

/// Provider-agnostic entry point to the LM service driving the
/// skill-agent tool loop. Deliberately narrower than a general chat
/// provider trait: no streaming, no embeddings — the agent loop only
/// ever needs one non-streaming turn at a time.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Identifier used in logs and trace events (e.g. `"openai"`).
    fn provider_id(&self) -> &str;
}
