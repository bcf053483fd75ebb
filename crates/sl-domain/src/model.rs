use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single distilled conversational context handed from distillation to
/// the skill-learning agent, either inline (fresh) or replayed off the
/// pending queue (crash recovery / concurrent arrival).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillLearnDistilled {
    pub project_id: Uuid,
    pub session_id: Uuid,
    pub task_id: Uuid,
    pub learning_space_id: Uuid,
    pub distilled_context: String,
}

/// A learned skill as seen by the agent loop and tool layer: enough to
/// render an index entry and to locate the skill's on-disk artifacts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillInfo {
    pub id: Uuid,
    pub disk_id: String,
    pub name: String,
    pub description: String,
    pub file_paths: Vec<String>,
}

/// Lifecycle of a session as it moves through distillation and
/// skill-learning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    Running,
    Queued,
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Running => "running",
            SessionStatus::Queued => "queued",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_status_as_str() {
        assert_eq!(SessionStatus::Pending.as_str(), "pending");
        assert_eq!(SessionStatus::Failed.as_str(), "failed");
    }

    #[test]
    fn skill_learn_distilled_roundtrips_through_json() {
        let item = SkillLearnDistilled {
            project_id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            task_id: Uuid::new_v4(),
            learning_space_id: Uuid::new_v4(),
            distilled_context: "user asked for X, agent did Y".into(),
        };
        let json = serde_json::to_string(&item).unwrap();
        let back: SkillLearnDistilled = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
