use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use sl_domain::error::Result;
use sl_domain::model::{SessionStatus, SkillInfo};
use uuid::Uuid;

use crate::store::{SessionRow, Store};

/// In-memory `Store` fake for orchestrator tests. Not a mock of the SQL —
/// callers assert on observable state (session status, skill rows) the
/// same way they would against `PgStore`.
#[derive(Default)]
pub struct InMemoryStore {
    sessions: Mutex<HashMap<Uuid, SessionRow>>,
    skills: Mutex<HashMap<Uuid, SkillInfo>>,
    space_skills: Mutex<HashMap<Uuid, Vec<Uuid>>>,
    distilled: Mutex<Vec<(Uuid, Uuid, Uuid, Uuid, String)>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_session(&self, row: SessionRow) {
        self.sessions.lock().insert(row.id, row);
    }

    pub fn seed_skill(&self, learning_space_id: Uuid, skill: SkillInfo) {
        self.space_skills
            .lock()
            .entry(learning_space_id)
            .or_default()
            .push(skill.id);
        self.skills.lock().insert(skill.id, skill);
    }

    pub fn distilled_contexts(&self) -> Vec<(Uuid, Uuid, Uuid, Uuid, String)> {
        self.distilled.lock().clone()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn get_session(&self, session_id: Uuid) -> Result<Option<SessionRow>> {
        Ok(self.sessions.lock().get(&session_id).cloned())
    }

    async fn set_session_status(&self, session_id: Uuid, status: SessionStatus) -> Result<()> {
        if let Some(row) = self.sessions.lock().get_mut(&session_id) {
            row.status = status;
        }
        Ok(())
    }

    async fn get_learning_space_skill_ids(&self, learning_space_id: Uuid) -> Result<Vec<Uuid>> {
        Ok(self
            .space_skills
            .lock()
            .get(&learning_space_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_skills_info(&self, skill_ids: &[Uuid]) -> Result<Vec<SkillInfo>> {
        let skills = self.skills.lock();
        Ok(skill_ids.iter().filter_map(|id| skills.get(id).cloned()).collect())
    }

    async fn store_distilled_context(
        &self,
        project_id: Uuid,
        session_id: Uuid,
        task_id: Uuid,
        learning_space_id: Uuid,
        distilled_context: &str,
    ) -> Result<()> {
        self.distilled.lock().push((
            project_id,
            session_id,
            task_id,
            learning_space_id,
            distilled_context.to_owned(),
        ));
        Ok(())
    }

    async fn upsert_skill(&self, learning_space_id: Uuid, skill: &SkillInfo) -> Result<()> {
        self.skills.lock().insert(skill.id, skill.clone());
        let mut space_skills = self.space_skills.lock();
        let ids = space_skills.entry(learning_space_id).or_default();
        if !ids.contains(&skill.id) {
            ids.push(skill.id);
        }
        Ok(())
    }
}
