use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use sl_domain::config::LlmConfig;
use sl_domain::error::{Error, Result};
use sl_domain::tool::{ContentPart, Message, MessageContent, Role, ToolCall};

use crate::provider::LlmProvider;
use crate::types::{ChatRequest, ChatResponse};

/// `LlmProvider` talking to an OpenAI-compatible `/chat/completions`
/// endpoint (OpenAI itself, Ollama, vLLM, and most self-hosted gateways
/// all speak this dialect).
pub struct HttpLlmProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    max_retries: u32,
}

impl HttpLlmProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| Error::Llm {
                provider: "http".into(),
                message: e.to_string(),
            })?;
        let api_key = config
            .api_key_env
            .as_ref()
            .and_then(|var| std::env::var(var).ok());
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            model: config.model.clone(),
            api_key,
            max_retries: config.max_retries,
        })
    }

    fn role_str(role: Role) -> &'static str {
        match role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }

    fn message_to_json(message: &Message) -> Value {
        match &message.content {
            MessageContent::Text(text) => json!({
                "role": Self::role_str(message.role),
                "content": text,
            }),
            MessageContent::Parts(parts) => {
                if let Some(ContentPart::ToolResult { tool_use_id, content, .. }) =
                    parts.iter().find(|p| matches!(p, ContentPart::ToolResult { .. }))
                {
                    json!({
                        "role": "tool",
                        "tool_call_id": tool_use_id,
                        "content": content,
                    })
                } else {
                    json!({
                        "role": Self::role_str(message.role),
                        "content": message.content.extract_all_text(),
                    })
                }
            }
        }
    }

    fn parse_response(body: &Value) -> Result<ChatResponse> {
        let choice = body
            .get("choices")
            .and_then(|c| c.get(0))
            .ok_or_else(|| Error::Llm {
                provider: "http".into(),
                message: "response had no choices".into(),
            })?;
        let message = choice.get("message").ok_or_else(|| Error::Llm {
            provider: "http".into(),
            message: "choice had no message".into(),
        })?;

        let content = message
            .get("content")
            .and_then(|c| c.as_str())
            .map(|s| s.to_owned());

        let tool_calls = message
            .get("tool_calls")
            .and_then(|tc| tc.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|tc| {
                        let id = tc.get("id")?.as_str()?.to_owned();
                        let function = tc.get("function")?;
                        let name = function.get("name")?.as_str()?.to_owned();
                        let raw_args = function.get("arguments")?.as_str().unwrap_or("{}");
                        let arguments: Value =
                            serde_json::from_str(raw_args).unwrap_or(Value::Null);
                        Some(ToolCall {
                            call_id: id,
                            tool_name: name,
                            arguments,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(ChatResponse { content, tool_calls })
    }
}

#[async_trait]
impl LlmProvider for HttpLlmProvider {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        let mut messages = vec![json!({
            "role": "system",
            "content": request.system_prompt,
        })];
        messages.extend(request.history.iter().map(Self::message_to_json));

        let mut payload = json!({
            "model": self.model,
            "messages": messages,
        });
        if !request.tools.is_empty() {
            let tools: Vec<Value> = request
                .tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters,
                        }
                    })
                })
                .collect();
            payload["tools"] = Value::Array(tools);
        }
        if let Some(temperature) = request.temperature {
            payload["temperature"] = json!(temperature);
        }
        if let Some(max_tokens) = request.max_tokens {
            payload["max_tokens"] = json!(max_tokens);
        }

        let url = format!("{}/chat/completions", self.base_url);
        let mut attempt = 0;
        loop {
            let mut req = self.client.post(&url).json(&payload);
            if let Some(key) = &self.api_key {
                req = req.bearer_auth(key);
            }

            let result = req.send().await;
            match result {
                Ok(resp) if resp.status().is_success() => {
                    let body: Value = resp.json().await.map_err(|e| Error::Llm {
                        provider: "http".into(),
                        message: e.to_string(),
                    })?;
                    return Self::parse_response(&body);
                }
                Ok(resp) => {
                    let status = resp.status();
                    let body = resp.text().await.unwrap_or_default();
                    if attempt >= self.max_retries {
                        return Err(Error::Llm {
                            provider: "http".into(),
                            message: format!("status {status}: {body}"),
                        });
                    }
                }
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(Error::Llm {
                            provider: "http".into(),
                            message: e.to_string(),
                        });
                    }
                }
            }
            attempt += 1;
        }
    }

    fn provider_id(&self) -> &str {
        "http"
    }
}
