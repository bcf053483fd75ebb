use serde::{Deserialize, Serialize};

/// Connection settings for the KV coordination store (locks, pending queues).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KvConfig {
    #[serde(default = "d_url")]
    pub url: String,
    /// Default lock TTL used when a caller doesn't specify one.
    #[serde(default = "d_lock_ttl")]
    pub default_lock_ttl_seconds: u64,
}

impl Default for KvConfig {
    fn default() -> Self {
        Self {
            url: d_url(),
            default_lock_ttl_seconds: d_lock_ttl(),
        }
    }
}

fn d_url() -> String {
    "redis://127.0.0.1:6379".into()
}

fn d_lock_ttl() -> u64 {
    60
}
