use serde::Serialize;

/// Structured trace events emitted across the skill-learning crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    LockAcquired {
        key: String,
        ttl_seconds: u64,
    },
    LockRenewed {
        key: String,
        ttl_seconds: u64,
        ok: bool,
    },
    LockReleased {
        key: String,
    },
    PendingDrained {
        learning_space_id: String,
        count: usize,
    },
    PendingPushed {
        learning_space_id: String,
    },
    ConsumerMessageReceived {
        queue: String,
        routing_key: String,
    },
    DistillationStored {
        session_id: String,
        learning_space_id: String,
    },
    AgentIterationCompleted {
        learning_space_id: String,
        iteration: u32,
        max_iterations: u32,
        tool_calls: usize,
    },
    ToolDispatched {
        tool_name: String,
        ok: bool,
    },
    AgentRunSucceeded {
        learning_space_id: String,
        sessions_processed: usize,
    },
    AgentRunFailed {
        learning_space_id: String,
        reason: String,
        re_pushed: usize,
    },
    SkillsRefreshed {
        learning_space_id: String,
        skill_count: usize,
    },
    SessionStatusChanged {
        session_id: String,
        status: String,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "sl_event");
    }
}
