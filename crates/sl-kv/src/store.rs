use async_trait::async_trait;
use sl_domain::error::Result;
use sl_domain::model::SkillLearnDistilled;

/// Distributed coordination primitives backing learning-space serialization
/// and the pending-context handoff between distillation and the agent.
///
/// Every method is scoped to a `project_id` so that two projects never
/// collide on the same key even if a learning-space id were reused.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Acquire `lock.{project_id}.{key}` if unheld. Returns `true` iff this
    /// call won the lock.
    async fn acquire_lock(&self, project_id: &str, key: &str, ttl_seconds: u64) -> Result<bool>;

    /// Extend the TTL of a lock this caller believes it holds. Returns
    /// `false` (not an error) if the lock had already expired or was
    /// never held — the caller decides whether that's fatal.
    async fn renew_lock(&self, project_id: &str, key: &str, ttl_seconds: u64) -> Result<bool>;

    /// Unconditionally delete the lock key. Safe to call even if the lock
    /// already expired.
    async fn release_lock(&self, project_id: &str, key: &str) -> Result<()>;

    /// Set `buffer_timer.{project_id}.{session_id}` only if absent. Returns
    /// `true` iff this call set it, used to coalesce rapid-fire
    /// distillation arrivals for the same session behind a single delay.
    async fn check_or_set_buffer_timer(
        &self,
        project_id: &str,
        session_id: &str,
        ttl_seconds: u64,
    ) -> Result<bool>;

    /// Append one item to the learning space's pending queue.
    async fn push_pending(
        &self,
        project_id: &str,
        learning_space_id: &str,
        item: &SkillLearnDistilled,
    ) -> Result<()>;

    /// Atomically pop up to `max_read` items off the front of the pending
    /// queue (or all of them, when `max_read` is `None`). `Some(0)` and
    /// `None` both short-circuit to an empty result without touching the
    /// store — a non-positive `max_read` means "nothing to do".
    async fn drain_pending(
        &self,
        project_id: &str,
        learning_space_id: &str,
        max_read: Option<i64>,
    ) -> Result<Vec<SkillLearnDistilled>>;
}

pub(crate) fn lock_key(project_id: &str, key: &str) -> String {
    format!("lock.{project_id}.{key}")
}

pub(crate) fn buffer_timer_key(project_id: &str, session_id: &str) -> String {
    format!("buffer_timer.{project_id}.{session_id}")
}

pub(crate) fn pending_key(project_id: &str, learning_space_id: &str) -> String {
    format!("skill_learn_pending.{project_id}.{learning_space_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_key_format() {
        assert_eq!(lock_key("proj-1", "skill_learn.space-1"), "lock.proj-1.skill_learn.space-1");
    }

    #[test]
    fn pending_key_format() {
        assert_eq!(
            pending_key("proj-1", "space-1"),
            "skill_learn_pending.proj-1.space-1"
        );
    }

    #[test]
    fn buffer_timer_key_format() {
        assert_eq!(
            buffer_timer_key("proj-1", "sess-1"),
            "buffer_timer.proj-1.sess-1"
        );
    }
}
