use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sl_domain::error::Result;
use sl_domain::model::{SessionStatus, SkillInfo};
use uuid::Uuid;

/// A completed conversational session as distillation sees it: enough to
/// resolve which learning space it belongs to and to mark its fate.
#[derive(Debug, Clone)]
pub struct SessionRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub learning_space_id: Uuid,
    pub status: SessionStatus,
    pub updated_at: DateTime<Utc>,
}

/// Relational store backing the skill-learning pipeline. Distillation
/// and the skill-agent both read/write through this trait; production
/// wires `PgStore`, tests wire an in-memory fake.
#[async_trait]
pub trait Store: Send + Sync {
    /// Look up a session's owning learning space and project.
    async fn get_session(&self, session_id: Uuid) -> Result<Option<SessionRow>>;

    /// Move a session to a new status. Idempotent — setting the same
    /// status twice is not an error.
    async fn set_session_status(&self, session_id: Uuid, status: SessionStatus) -> Result<()>;

    /// Every skill id currently registered to a learning space, in no
    /// particular order.
    async fn get_learning_space_skill_ids(&self, learning_space_id: Uuid) -> Result<Vec<Uuid>>;

    /// Hydrate skill ids into full `SkillInfo` rows. Ids that no longer
    /// exist are silently dropped, not an error — a skill can be deleted
    /// by one agent run while another has a stale id list in flight.
    async fn get_skills_info(&self, skill_ids: &[Uuid]) -> Result<Vec<SkillInfo>>;

    /// Persist a distilled context row for audit/replay. Called once per
    /// context, before it's hitting the pending queue or the live agent
    /// run — this is the durability boundary the no-loss guarantee rests
    /// on.
    async fn store_distilled_context(
        &self,
        project_id: Uuid,
        session_id: Uuid,
        task_id: Uuid,
        learning_space_id: Uuid,
        distilled_context: &str,
    ) -> Result<()>;

    /// Insert a skill or, if `disk_id` already exists in the learning
    /// space, overwrite its name/description/file_paths.
    async fn upsert_skill(&self, learning_space_id: Uuid, skill: &SkillInfo) -> Result<()>;
}
