use async_trait::async_trait;
use sl_domain::error::{Error, Result};
use sl_domain::model::{SessionStatus, SkillInfo};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::store::{SessionRow, Store};

/// `Store` backed by Postgres via `sqlx`. Schema is managed outside this
/// crate (migrations live alongside the gateway binary); these queries
/// assume `sessions`, `learning_space_skills`, `skills`, and
/// `distilled_contexts` tables already exist.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| Error::Db(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn row_to_status(s: &str) -> Result<SessionStatus> {
    match s {
        "pending" => Ok(SessionStatus::Pending),
        "running" => Ok(SessionStatus::Running),
        "queued" => Ok(SessionStatus::Queued),
        "completed" => Ok(SessionStatus::Completed),
        "failed" => Ok(SessionStatus::Failed),
        other => Err(Error::Corrupt(format!("unknown session status {other:?}"))),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn get_session(&self, session_id: Uuid) -> Result<Option<SessionRow>> {
        let row = sqlx::query(
            "SELECT id, project_id, learning_space_id, status, updated_at \
             FROM sessions WHERE id = $1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Db(e.to_string()))?;

        let Some(row) = row else { return Ok(None) };
        let status: String = row.try_get("status").map_err(|e| Error::Db(e.to_string()))?;
        Ok(Some(SessionRow {
            id: row.try_get("id").map_err(|e| Error::Db(e.to_string()))?,
            project_id: row.try_get("project_id").map_err(|e| Error::Db(e.to_string()))?,
            learning_space_id: row
                .try_get("learning_space_id")
                .map_err(|e| Error::Db(e.to_string()))?,
            status: row_to_status(&status)?,
            updated_at: row.try_get("updated_at").map_err(|e| Error::Db(e.to_string()))?,
        }))
    }

    async fn set_session_status(&self, session_id: Uuid, status: SessionStatus) -> Result<()> {
        sqlx::query("UPDATE sessions SET status = $2, updated_at = now() WHERE id = $1")
            .bind(session_id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Db(e.to_string()))?;
        Ok(())
    }

    async fn get_learning_space_skill_ids(&self, learning_space_id: Uuid) -> Result<Vec<Uuid>> {
        let rows = sqlx::query("SELECT skill_id FROM learning_space_skills WHERE learning_space_id = $1")
            .bind(learning_space_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Db(e.to_string()))?;
        rows.into_iter()
            .map(|r| r.try_get::<Uuid, _>("skill_id").map_err(|e| Error::Db(e.to_string())))
            .collect()
    }

    async fn get_skills_info(&self, skill_ids: &[Uuid]) -> Result<Vec<SkillInfo>> {
        if skill_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(
            "SELECT id, disk_id, name, description, file_paths FROM skills WHERE id = ANY($1)",
        )
        .bind(skill_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::Db(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                let file_paths: serde_json::Value =
                    row.try_get("file_paths").map_err(|e| Error::Db(e.to_string()))?;
                let file_paths: Vec<String> = serde_json::from_value(file_paths)?;
                Ok(SkillInfo {
                    id: row.try_get("id").map_err(|e| Error::Db(e.to_string()))?,
                    disk_id: row.try_get("disk_id").map_err(|e| Error::Db(e.to_string()))?,
                    name: row.try_get("name").map_err(|e| Error::Db(e.to_string()))?,
                    description: row
                        .try_get("description")
                        .map_err(|e| Error::Db(e.to_string()))?,
                    file_paths,
                })
            })
            .collect()
    }

    async fn store_distilled_context(
        &self,
        project_id: Uuid,
        session_id: Uuid,
        task_id: Uuid,
        learning_space_id: Uuid,
        distilled_context: &str,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO distilled_contexts \
             (project_id, session_id, task_id, learning_space_id, distilled_context, created_at) \
             VALUES ($1, $2, $3, $4, $5, now())",
        )
        .bind(project_id)
        .bind(session_id)
        .bind(task_id)
        .bind(learning_space_id)
        .bind(distilled_context)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Db(e.to_string()))?;
        Ok(())
    }

    async fn upsert_skill(&self, learning_space_id: Uuid, skill: &SkillInfo) -> Result<()> {
        let file_paths = serde_json::to_value(&skill.file_paths)?;
        sqlx::query(
            "INSERT INTO skills (id, disk_id, name, description, file_paths) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (disk_id) DO UPDATE SET \
               name = EXCLUDED.name, description = EXCLUDED.description, file_paths = EXCLUDED.file_paths",
        )
        .bind(skill.id)
        .bind(&skill.disk_id)
        .bind(&skill.name)
        .bind(&skill.description)
        .bind(&file_paths)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Db(e.to_string()))?;

        sqlx::query(
            "INSERT INTO learning_space_skills (learning_space_id, skill_id) \
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(learning_space_id)
        .bind(skill.id)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Db(e.to_string()))?;
        Ok(())
    }
}
