use serde::{Deserialize, Serialize};

/// Connection and consumer settings for the message bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusConfig {
    #[serde(default = "d_url")]
    pub url: String,
    /// Prefetch count applied to every registered consumer channel.
    #[serde(default = "d_prefetch")]
    pub prefetch: u16,
    /// How long the distillation consumer waits for a delivery before
    /// giving up on a single receive and looping back.
    #[serde(default = "d_distill_timeout")]
    pub distill_consumer_timeout_seconds: u64,
    /// How long the skill-agent consumer waits for a delivery. This is
    /// also the hard cancellation boundary for a single agent run.
    #[serde(default = "d_agent_timeout")]
    pub agent_consumer_timeout_seconds: u64,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            url: d_url(),
            prefetch: d_prefetch(),
            distill_consumer_timeout_seconds: d_distill_timeout(),
            agent_consumer_timeout_seconds: d_agent_timeout(),
        }
    }
}

fn d_url() -> String {
    "amqp://127.0.0.1:5672/%2f".into()
}

fn d_prefetch() -> u16 {
    8
}

fn d_distill_timeout() -> u64 {
    30
}

fn d_agent_timeout() -> u64 {
    300
}
