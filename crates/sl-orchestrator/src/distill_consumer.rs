use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sl_bus::{AmqpBus, Delivery, MessageBus, AGENT_BINDING, DISTILL_BINDING};
use sl_db::Store;
use sl_domain::config::BusConfig;
use sl_domain::error::Result;
use sl_domain::model::{SessionStatus, SkillLearnDistilled};
use sl_domain::trace::TraceEvent;
use sl_llm::LlmProvider;
use uuid::Uuid;

use crate::distill::distill;

/// Wire payload carried on `DISTILL_BINDING`: a closed conversational
/// session awaiting distillation. `content` is the transcript the
/// close-session path already assembled; this consumer never reads
/// session messages itself.
#[derive(Debug, Serialize, Deserialize)]
pub struct DistillationTask {
    pub project_id: Uuid,
    pub session_id: Uuid,
    pub task_id: Uuid,
    pub learning_space_id: Option<Uuid>,
    pub content: String,
}

/// Run the distillation consumer until the connection drops or the
/// process is asked to stop.
///
/// Each task is turned into a `DistilledContext` by a single LM call (or
/// dropped if the session has no learning space, or if the model judges
/// it not worth learning from). The result is unconditionally published
/// as the *live* body of an `AGENT_BINDING` trigger; no locking is
/// needed here, since serialization per learning space is entirely the
/// skill-agent consumer's concern.
pub async fn run_distill_consumer(
    bus: Arc<AmqpBus>,
    store: Arc<dyn Store>,
    llm: Arc<dyn LlmProvider>,
    bus_config: BusConfig,
) -> Result<()> {
    let mut consumer = bus.consumer(&DISTILL_BINDING, bus_config.prefetch).await?;
    let timeout = Duration::from_secs(bus_config.distill_consumer_timeout_seconds);

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

        match handle_one(&delivery, &store, &bus, &llm).await {
            Ok(()) => delivery.ack().await?,
            Err(e) => {
                tracing::warn!(error = %e, "distillation message handling failed, requeueing");
                delivery.nack_requeue().await?;
            }
        }
    }
}

async fn handle_one(
    delivery: &Delivery,
    store: &Arc<dyn Store>,
    bus: &Arc<AmqpBus>,
    llm: &Arc<dyn LlmProvider>,
) -> Result<()> {
    let task: DistillationTask = serde_json::from_slice(&delivery.data)?;

    let learning_space_id = match task.learning_space_id {
        Some(id) => id,
        None => {
            tracing::info!(session_id = %task.session_id, "session has no learning space, skipping distillation");
            return Ok(());
        }
    };

    store.set_session_status(task.session_id, SessionStatus::Running).await?;
    TraceEvent::SessionStatusChanged {
        session_id: task.session_id.to_string(),
        status: SessionStatus::Running.as_str().to_string(),
    }
    .emit();

    let distilled_context = match distill(llm.as_ref(), &task.content).await {
        Ok(Some(text)) => text,
        Ok(None) => {
            tracing::info!(session_id = %task.session_id, "distillation found nothing worth learning");
            return Ok(());
        }
        Err(e) => {
            tracing::warn!(session_id = %task.session_id, error = %e, "distillation pipeline failed");
            store.set_session_status(task.session_id, SessionStatus::Failed).await?;
            TraceEvent::SessionStatusChanged {
                session_id: task.session_id.to_string(),
                status: SessionStatus::Failed.as_str().to_string(),
            }
            .emit();
            return Ok(());
        }
    };

    store
        .store_distilled_context(
            task.project_id,
            task.session_id,
            task.task_id,
            learning_space_id,
            &distilled_context,
        )
        .await?;
    TraceEvent::DistillationStored {
        session_id: task.session_id.to_string(),
        learning_space_id: learning_space_id.to_string(),
    }
    .emit();

    let item = SkillLearnDistilled {
        project_id: task.project_id,
        session_id: task.session_id,
        task_id: task.task_id,
        learning_space_id,
        distilled_context,
    };

    let payload = serde_json::to_vec(&item)?;
    bus.publish(&AGENT_BINDING, &payload).await?;
    Ok(())
}
