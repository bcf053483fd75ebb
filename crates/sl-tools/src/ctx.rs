use std::path::PathBuf;
use std::sync::Arc;

use sl_db::Store;
use sl_skills::SkillSnapshot;
use uuid::Uuid;

/// Per-run context threaded through every tool dispatch in a single
/// agent iteration. `has_reported_thinking` survives across iterations
/// (the orchestrator copies it back out after each iteration and into
/// the next ctx it builds) but `skills` is rebuilt wholesale whenever the
/// orchestrator refreshes skills after a mid-run drain.
pub struct SkillLearnerCtx {
    pub store: Arc<dyn Store>,
    pub project_id: Uuid,
    pub learning_space_id: Uuid,
    pub user_id: Option<Uuid>,
    pub skills: SkillSnapshot,
    pub skills_root: PathBuf,
    pub has_reported_thinking: bool,
}

impl SkillLearnerCtx {
    pub fn skill_dir(&self) -> PathBuf {
        self.skills_root.join(self.learning_space_id.to_string())
    }
}
