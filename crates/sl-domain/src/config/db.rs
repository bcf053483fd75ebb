use serde::{Deserialize, Serialize};

/// Connection settings for the relational store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    #[serde(default = "d_url")]
    pub url: String,
    #[serde(default = "d_max_connections")]
    pub max_connections: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: d_url(),
            max_connections: d_max_connections(),
        }
    }
}

fn d_url() -> String {
    "postgres://localhost/skill_learning".into()
}

fn d_max_connections() -> u32 {
    10
}
