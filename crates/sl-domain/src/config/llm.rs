use serde::{Deserialize, Serialize};

/// Settings for the LM service used to drive the skill-agent tool loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    /// Env var holding the API key. Empty means no auth header is sent.
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default = "d_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default = "d_retries")]
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".into(),
            model: "qwen2.5:14b".into(),
            api_key_env: None,
            request_timeout_seconds: d_timeout(),
            max_retries: d_retries(),
        }
    }
}

fn d_timeout() -> u64 {
    60
}

fn d_retries() -> u32 {
    2
}
