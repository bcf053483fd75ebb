use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use sl_domain::error::{Error, Result};
use sl_domain::model::SkillLearnDistilled;
use sl_domain::trace::TraceEvent;

use crate::store::{buffer_timer_key, lock_key, pending_key, KvStore};

/// `KvStore` backed by a real Redis (or Redis-protocol-compatible) server.
pub struct RedisKvStore {
    conn: ConnectionManager,
}

impl RedisKvStore {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(|e| Error::Kv(e.to_string()))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| Error::Kv(e.to_string()))?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn acquire_lock(&self, project_id: &str, key: &str, ttl_seconds: u64) -> Result<bool> {
        let full_key = lock_key(project_id, key);
        let mut conn = self.conn.clone();
        let got: Option<String> = redis::cmd("SET")
            .arg(&full_key)
            .arg("1")
            .arg("NX")
            .arg("EX")
            .arg(ttl_seconds)
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::Kv(e.to_string()))?;
        let acquired = got.is_some();
        if acquired {
            TraceEvent::LockAcquired {
                key: full_key,
                ttl_seconds,
            }
            .emit();
        }
        Ok(acquired)
    }

    async fn renew_lock(&self, project_id: &str, key: &str, ttl_seconds: u64) -> Result<bool> {
        let full_key = lock_key(project_id, key);
        let mut conn = self.conn.clone();
        let got: Option<String> = redis::cmd("SET")
            .arg(&full_key)
            .arg("1")
            .arg("XX")
            .arg("EX")
            .arg(ttl_seconds)
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::Kv(e.to_string()))?;
        let renewed = got.is_some();
        TraceEvent::LockRenewed {
            key: full_key,
            ttl_seconds,
            ok: renewed,
        }
        .emit();
        Ok(renewed)
    }

    async fn release_lock(&self, project_id: &str, key: &str) -> Result<()> {
        let full_key = lock_key(project_id, key);
        let mut conn = self.conn.clone();
        let _: () = conn
            .del(&full_key)
            .await
            .map_err(|e| Error::Kv(e.to_string()))?;
        TraceEvent::LockReleased { key: full_key }.emit();
        Ok(())
    }

    async fn check_or_set_buffer_timer(
        &self,
        project_id: &str,
        session_id: &str,
        ttl_seconds: u64,
    ) -> Result<bool> {
        let full_key = buffer_timer_key(project_id, session_id);
        let mut conn = self.conn.clone();
        let got: Option<String> = redis::cmd("SET")
            .arg(&full_key)
            .arg("1")
            .arg("NX")
            .arg("EX")
            .arg(ttl_seconds)
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::Kv(e.to_string()))?;
        Ok(got.is_some())
    }

    async fn push_pending(
        &self,
        project_id: &str,
        learning_space_id: &str,
        item: &SkillLearnDistilled,
    ) -> Result<()> {
        let full_key = pending_key(project_id, learning_space_id);
        let body = serde_json::to_string(item)?;
        let mut conn = self.conn.clone();
        let _: () = conn
            .rpush(&full_key, body)
            .await
            .map_err(|e| Error::Kv(e.to_string()))?;
        TraceEvent::PendingPushed {
            learning_space_id: learning_space_id.to_owned(),
        }
        .emit();
        Ok(())
    }

    async fn drain_pending(
        &self,
        project_id: &str,
        learning_space_id: &str,
        max_read: Option<i64>,
    ) -> Result<Vec<SkillLearnDistilled>> {
        if let Some(n) = max_read {
            if n <= 0 {
                return Ok(Vec::new());
            }
        }

        let full_key = pending_key(project_id, learning_space_id);
        let mut conn = self.conn.clone();

        let raw: Vec<String> = match max_read {
            None => {
                let (items, _deleted): (Vec<String>, i64) = redis::pipe()
                    .atomic()
                    .lrange(&full_key, 0, -1)
                    .del(&full_key)
                    .query_async(&mut conn)
                    .await
                    .map_err(|e| Error::Kv(e.to_string()))?;
                items
            }
            Some(n) => {
                let (items, _trimmed): (Vec<String>, ()) = redis::pipe()
                    .atomic()
                    .lrange(&full_key, 0, n - 1)
                    .ltrim(&full_key, n, -1)
                    .query_async(&mut conn)
                    .await
                    .map_err(|e| Error::Kv(e.to_string()))?;
                items
            }
        };

        let items = raw
            .into_iter()
            .map(|s| serde_json::from_str(&s).map_err(Error::from))
            .collect::<Result<Vec<_>>>()?;

        if !items.is_empty() {
            TraceEvent::PendingDrained {
                learning_space_id: learning_space_id.to_owned(),
                count: items.len(),
            }
            .emit();
        }

        Ok(items)
    }
}
