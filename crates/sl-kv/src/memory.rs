use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use sl_domain::error::Result;
use sl_domain::model::SkillLearnDistilled;

use crate::store::{buffer_timer_key, lock_key, pending_key, KvStore};

struct TtlEntry {
    expires_at: Instant,
}

/// In-process `KvStore` used by tests and by `cargo run`-less local
/// experimentation. Mirrors Redis's NX/XX/EX semantics exactly so tests
/// written against it stay valid against `RedisKvStore`.
#[derive(Default)]
pub struct InMemoryKvStore {
    locks: Mutex<HashMap<String, TtlEntry>>,
    pending: Mutex<HashMap<String, VecDeque<SkillLearnDistilled>>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_live(entry: &TtlEntry) -> bool {
        entry.expires_at > Instant::now()
    }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn acquire_lock(&self, project_id: &str, key: &str, ttl_seconds: u64) -> Result<bool> {
        let full_key = lock_key(project_id, key);
        let mut locks = self.locks.lock();
        if let Some(existing) = locks.get(&full_key) {
            if Self::is_live(existing) {
                return Ok(false);
            }
        }
        locks.insert(
            full_key,
            TtlEntry {
                expires_at: Instant::now() + Duration::from_secs(ttl_seconds),
            },
        );
        Ok(true)
    }

    async fn renew_lock(&self, project_id: &str, key: &str, ttl_seconds: u64) -> Result<bool> {
        let full_key = lock_key(project_id, key);
        let mut locks = self.locks.lock();
        match locks.get_mut(&full_key) {
            Some(entry) if Self::is_live(entry) => {
                entry.expires_at = Instant::now() + Duration::from_secs(ttl_seconds);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release_lock(&self, project_id: &str, key: &str) -> Result<()> {
        let full_key = lock_key(project_id, key);
        self.locks.lock().remove(&full_key);
        Ok(())
    }

    async fn check_or_set_buffer_timer(
        &self,
        project_id: &str,
        session_id: &str,
        ttl_seconds: u64,
    ) -> Result<bool> {
        let full_key = buffer_timer_key(project_id, session_id);
        let mut locks = self.locks.lock();
        if let Some(existing) = locks.get(&full_key) {
            if Self::is_live(existing) {
                return Ok(false);
            }
        }
        locks.insert(
            full_key,
            TtlEntry {
                expires_at: Instant::now() + Duration::from_secs(ttl_seconds),
            },
        );
        Ok(true)
    }

    async fn push_pending(
        &self,
        project_id: &str,
        learning_space_id: &str,
        item: &SkillLearnDistilled,
    ) -> Result<()> {
        let full_key = pending_key(project_id, learning_space_id);
        self.pending
            .lock()
            .entry(full_key)
            .or_default()
            .push_back(item.clone());
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
        let mut pending = self.pending.lock();
        let Some(queue) = pending.get_mut(&full_key) else {
            return Ok(Vec::new());
        };
        let take = max_read
            .map(|n| n as usize)
            .unwrap_or(queue.len())
            .min(queue.len());
        Ok(queue.drain(..take).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn item(ctx: &str) -> SkillLearnDistilled {
        SkillLearnDistilled {
            project_id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            task_id: Uuid::new_v4(),
            learning_space_id: Uuid::new_v4(),
            distilled_context: ctx.into(),
        }
    }

    #[tokio::test]
    async fn acquire_lock_is_exclusive() {
        let kv = InMemoryKvStore::new();
        assert!(kv.acquire_lock("p1", "skill_learn.s1", 60).await.unwrap());
        assert!(!kv.acquire_lock("p1", "skill_learn.s1", 60).await.unwrap());
    }

    #[tokio::test]
    async fn release_then_acquire_succeeds() {
        let kv = InMemoryKvStore::new();
        assert!(kv.acquire_lock("p1", "k", 60).await.unwrap());
        kv.release_lock("p1", "k").await.unwrap();
        assert!(kv.acquire_lock("p1", "k", 60).await.unwrap());
    }

    #[tokio::test]
    async fn renew_fails_if_not_held() {
        let kv = InMemoryKvStore::new();
        assert!(!kv.renew_lock("p1", "k", 60).await.unwrap());
    }

    #[tokio::test]
    async fn renew_succeeds_if_held() {
        let kv = InMemoryKvStore::new();
        kv.acquire_lock("p1", "k", 60).await.unwrap();
        assert!(kv.renew_lock("p1", "k", 120).await.unwrap());
    }

    #[tokio::test]
    async fn locks_are_isolated_per_project() {
        let kv = InMemoryKvStore::new();
        assert!(kv.acquire_lock("p1", "k", 60).await.unwrap());
        assert!(kv.acquire_lock("p2", "k", 60).await.unwrap());
    }

    #[tokio::test]
    async fn drain_pending_empty_queue_returns_empty() {
        let kv = InMemoryKvStore::new();
        assert!(kv.drain_pending("p1", "s1", None).await.unwrap().is_empty());
        assert!(kv.drain_pending("p1", "s1", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn drain_pending_zero_max_read_short_circuits_without_touching_queue() {
        let kv = InMemoryKvStore::new();
        kv.push_pending("p1", "s1", &item("a")).await.unwrap();
        assert!(kv.drain_pending("p1", "s1", Some(0)).await.unwrap().is_empty());
        let all = kv.drain_pending("p1", "s1", None).await.unwrap();
        assert_eq!(all.len(), 1, "the zero-read must not have consumed the item");
    }

    #[tokio::test]
    async fn drain_pending_respects_fifo_order() {
        let kv = InMemoryKvStore::new();
        kv.push_pending("p1", "s1", &item("a")).await.unwrap();
        kv.push_pending("p1", "s1", &item("b")).await.unwrap();
        kv.push_pending("p1", "s1", &item("c")).await.unwrap();
        let drained = kv.drain_pending("p1", "s1", Some(2)).await.unwrap();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].distilled_context, "a");
        assert_eq!(drained[1].distilled_context, "b");
        let rest = kv.drain_pending("p1", "s1", None).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].distilled_context, "c");
    }

    #[tokio::test]
    async fn buffer_timer_nx_semantics() {
        let kv = InMemoryKvStore::new();
        assert!(kv.check_or_set_buffer_timer("p1", "sess1", 10).await.unwrap());
        assert!(!kv.check_or_set_buffer_timer("p1", "sess1", 10).await.unwrap());
    }
}
