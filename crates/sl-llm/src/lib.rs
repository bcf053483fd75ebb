mod http;
mod mock;
mod provider;
mod types;

pub use http::HttpLlmProvider;
pub use mock::MockLlmProvider;
pub use provider::LlmProvider;
pub use types::{ChatRequest, ChatResponse};
