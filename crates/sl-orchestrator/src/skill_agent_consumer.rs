use std::sync::Arc;
use std::time::Duration;

use sl_bus::{AmqpBus, MessageBus, AGENT_BINDING};
use sl_db::Store;
use sl_domain::config::{BusConfig, KvConfig, SkillLearnConfig};
use sl_domain::error::Result;
use sl_domain::model::{SessionStatus, SkillLearnDistilled};
use sl_domain::trace::TraceEvent;
use sl_kv::KvStore;
use sl_llm::LlmProvider;

use crate::agent_loop::run_agent_loop;
use crate::status::mark_sessions;

/// Run the skill-agent consumer until the connection drops or the
/// process is asked to stop.
///
/// Serialization across concurrent triggers for the same learning space
/// rests entirely on the KV lock: if it can't be acquired, the live
/// context is parked to the pending queue for whoever holds the lock to
/// pick up, the session is marked `queued`, and the delivery is acked —
/// no busy-waiting. On agent-loop failure the run's own drained contexts
/// are already back on the pending queue (see `run_agent_loop`), so the
/// trigger is acked rather than retried; retrying it would just race the
/// next legitimate trigger for the same space. A successful run always
/// tries to retrigger itself once more so the queue keeps draining even
/// if no further distillations arrive.
pub async fn run_skill_agent_consumer(
    bus: Arc<AmqpBus>,
    store: Arc<dyn Store>,
    kv: Arc<dyn KvStore>,
    llm: Arc<dyn LlmProvider>,
    bus_config: BusConfig,
    kv_config: KvConfig,
    skill_learn_config: SkillLearnConfig,
) -> Result<()> {
    let mut consumer = bus.consumer(&AGENT_BINDING, bus_config.prefetch).await?;
    let timeout = Duration::from_secs(bus_config.agent_consumer_timeout_seconds);

    loop {
        let delivery = match consumer.recv(timeout).await? {
            Some(d) => d,
            None => continue,
        };
        TraceEvent::ConsumerMessageReceived {
            queue: consumer.queue().to_string(),
            routing_key: delivery.routing_key.clone(),
        }
        .emit();

        let live: SkillLearnDistilled = match serde_json::from_slice(&delivery.data) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(error = %e, "malformed agent trigger, dropping");
                delivery.ack().await?;
                continue;
            }
        };

        let project = live.project_id.to_string();
        let space = live.learning_space_id.to_string();
        let lock_key = format!("skill_learn.{}", live.learning_space_id);
        let lock_ttl = kv_config.default_lock_ttl_seconds;

        if !kv.acquire_lock(&project, &lock_key, lock_ttl).await? {
            kv.push_pending(&project, &space, &live).await?;
            store.set_session_status(live.session_id, SessionStatus::Queued).await?;
            TraceEvent::SessionStatusChanged {
                session_id: live.session_id.to_string(),
                status: SessionStatus::Queued.as_str().to_string(),
            }
            .emit();
            delivery.ack().await?;
            continue;
        }
        TraceEvent::LockAcquired { key: lock_key.clone(), ttl_seconds: lock_ttl }.emit();

        let live_session_id = live.session_id;
        let outcome =
            run_agent_loop(store.clone(), kv.clone(), llm.clone(), &skill_learn_config, live, &lock_key, lock_ttl)
                .await;

        let should_retrigger = match &outcome {
            Ok(result) => {
                let mut completed = result.processed_session_ids.clone();
                completed.push(live_session_id);
                mark_sessions(&store, &completed, SessionStatus::Completed).await?;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "skill-agent run failed, drained contexts already re-queued");
                mark_sessions(&store, &[live_session_id], SessionStatus::Failed).await?;
                false
            }
        };

        kv.release_lock(&project, &lock_key).await?;
        TraceEvent::LockReleased { key: lock_key.clone() }.emit();

        if should_retrigger {
            let remaining = kv.drain_pending(&project, &space, Some(1)).await?;
            if let Some(next) = remaining.into_iter().next() {
                let payload = serde_json::to_vec(&next)?;
                bus.publish(&AGENT_BINDING, &payload).await?;
            }
        }

        delivery.ack().await?;
    }
}
