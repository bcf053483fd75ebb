use sl_domain::tool::{Message, ToolCall, ToolDefinition};

/// A single non-streaming completion request. `system_prompt` and
/// `history` are kept separate (rather than folded into one message
/// list) because every provider wire format treats the system prompt
/// specially.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system_prompt: String,
    pub history: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn new(system_prompt: impl Into<String>, history: Vec<Message>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            history,
            tools: Vec::new(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChatResponse {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

impl ChatResponse {
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}
