use serde::{Deserialize, Serialize};

/// Structured logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. "sl_orchestrator=info".
    #[serde(default = "d_filter")]
    pub log_filter: String,
    /// Emit newline-delimited JSON instead of the human-readable format.
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: d_filter(),
            json_logs: false,
        }
    }
}

fn d_filter() -> String {
    "info".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_info() {
        assert_eq!(ObservabilityConfig::default().log_filter, "info");
    }

    #[test]
    fn default_json_logs_is_false() {
        assert!(!ObservabilityConfig::default().json_logs);
    }

    #[test]
    fn deserialize_empty_uses_defaults() {
        let cfg: ObservabilityConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.log_filter, "info");
        assert!(!cfg.json_logs);
    }

    #[test]
    fn deserialize_with_values() {
        let toml_str = r#"
            log_filter = "sl_orchestrator=debug,warn"
            json_logs = true
        "#;
        let cfg: ObservabilityConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.log_filter, "sl_orchestrator=debug,warn");
        assert!(cfg.json_logs);
    }
}
