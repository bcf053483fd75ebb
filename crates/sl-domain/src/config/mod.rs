mod bus;
mod db;
mod kv;
mod llm;
mod observability;
mod skill_learn;

pub use bus::*;
pub use db::*;
pub use kv::*;
pub use llm::*;
pub use observability::*;
pub use skill_learn::*;

use serde::{Deserialize, Serialize};

/// Top-level process configuration, loaded from a TOML file and
/// overlaid with environment variables (`SL_` prefix, `__` as the
/// nesting separator) by the gateway binary.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub kv: KvConfig,
    #[serde(default)]
    pub bus: BusConfig,
    #[serde(default)]
    pub db: DbConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub skill_learn: SkillLearnConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Validate cross-field invariants; returns human-readable issues.
    ///
    /// Unlike field-level `#[serde(default)]`, these checks catch values
    /// that parse fine but would misbehave once the orchestrator runs.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.kv.url.is_empty() {
            errors.push("kv.url must not be empty".into());
        }
        if self.bus.url.is_empty() {
            errors.push("bus.url must not be empty".into());
        }
        if self.db.url.is_empty() {
            errors.push("db.url must not be empty".into());
        }
        if self.llm.base_url.is_empty() {
            errors.push("llm.base_url must not be empty".into());
        }
        if self.llm.model.is_empty() {
            errors.push("llm.model must not be empty".into());
        }
        if self.bus.agent_consumer_timeout_seconds == 0 {
            errors.push("bus.agent_consumer_timeout_seconds must be greater than 0".into());
        }
        if self.kv.default_lock_ttl_seconds < self.bus.agent_consumer_timeout_seconds {
            errors.push(
                "kv.default_lock_ttl_seconds should be >= bus.agent_consumer_timeout_seconds \
                 or the lock can expire mid-run even with renewal"
                    .into(),
            );
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            kv: KvConfig {
                default_lock_ttl_seconds: 600,
                ..KvConfig::default()
            },
            llm: LlmConfig {
                base_url: "https://api.openai.com/v1".into(),
                model: "gpt-4o-mini".into(),
                ..LlmConfig::default()
            },
            ..Config::default()
        }
    }

    #[test]
    fn valid_config_has_no_errors() {
        assert!(valid_config().validate().is_empty());
    }

    #[test]
    fn empty_db_url_is_error() {
        let mut cfg = valid_config();
        cfg.db.url = String::new();
        assert!(cfg.validate().iter().any(|e| e.contains("db.url")));
    }

    #[test]
    fn lock_ttl_shorter_than_consumer_timeout_is_flagged() {
        let mut cfg = valid_config();
        cfg.kv.default_lock_ttl_seconds = 5;
        cfg.bus.agent_consumer_timeout_seconds = 300;
        assert!(cfg
            .validate()
            .iter()
            .any(|e| e.contains("default_lock_ttl_seconds")));
    }

    #[test]
    fn zero_consumer_timeout_is_error() {
        let mut cfg = valid_config();
        cfg.bus.agent_consumer_timeout_seconds = 0;
        assert!(cfg
            .validate()
            .iter()
            .any(|e| e.contains("agent_consumer_timeout_seconds")));
    }
}
