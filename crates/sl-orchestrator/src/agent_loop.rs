use std::path::PathBuf;
use std::sync::Arc;

use sl_db::Store;
use sl_domain::config::SkillLearnConfig;
use sl_domain::error::{Error, Result};
use sl_domain::model::SkillLearnDistilled;
use sl_domain::tool::Message;
use sl_domain::trace::TraceEvent;
use sl_kv::KvStore;
use sl_llm::{ChatRequest, LlmProvider};
use sl_skills::SkillSnapshot;
use sl_tools::{SkillLearnerCtx, FINISH_TOOL};
use uuid::Uuid;

use crate::prompt;

/// What a successful run accomplished: every session whose distilled
/// context was folded into this run and should now be marked complete.
pub struct AgentLoopOutcome {
    pub processed_session_ids: Vec<Uuid>,
}

/// Run the bounded multi-turn tool loop for one learning space.
///
/// `live` is the distilled context that triggered this run — the body
/// the skill-agent consumer received off the bus — and is always folded
/// into the first turn regardless of what else is pending. On top of
/// it, drains the pending queue and alternates LM turns with tool
/// dispatch until the model calls `finish` with nothing new pending, or
/// the iteration budget runs out. Every iteration re-drains the pending
/// queue: a fresh arrival during the run extends the budget and resets
/// `finish` so the new context always gets seen before the run ends.
///
/// On success, returns the session ids of every context drained from
/// the pending queue (entry and mid-run) — never including `live`'s own
/// session id, which the caller already knows to mark complete. On
/// failure, every drained item is pushed back onto the pending queue
/// before the error is returned; `live` itself is not re-pushed here —
/// that policy belongs to the caller.
pub async fn run_agent_loop(
    store: Arc<dyn Store>,
    kv: Arc<dyn KvStore>,
    llm: Arc<dyn LlmProvider>,
    config: &SkillLearnConfig,
    live: SkillLearnDistilled,
    lock_key: &str,
    lock_ttl_seconds: u64,
) -> Result<AgentLoopOutcome> {
    let project_id = live.project_id;
    let learning_space_id = live.learning_space_id;
    let project = project_id.to_string();
    let space = learning_space_id.to_string();

    let mut drained = kv
        .drain_pending(&project, &space, Some(config.max_contexts_per_agent_run as i64))
        .await?;
    TraceEvent::PendingDrained {
        learning_space_id: space.clone(),
        count: drained.len(),
    }
    .emit();

    let skill_ids = store.get_learning_space_skill_ids(learning_space_id).await?;
    let mut skills = SkillSnapshot::from_skills(store.get_skills_info(&skill_ids).await?);
    let skills_root = PathBuf::from(&config.skills_root);

    let system_prompt = prompt::system_prompt();
    let mut history = vec![prompt::pack_initial_message(&live, &drained, &skills)];
    let mut max_iterations = config.agent_max_iterations;
    let mut iteration = 0u32;
    let mut has_reported_thinking = false;

    let run: Result<()> = async {
        while iteration < max_iterations {
            let request = ChatRequest::new(system_prompt.clone(), history.clone())
                .with_tools(sl_tools::tool_definitions());
            let response = llm.complete(request).await?;

            if let Some(text) = &response.content {
                history.push(Message::assistant(text.clone()));
            }
            if !response.has_tool_calls() {
                break;
            }

            let mut ctx = SkillLearnerCtx {
                store: store.clone(),
                project_id,
                learning_space_id,
                user_id: None,
                skills: skills.clone(),
                skills_root: skills_root.clone(),
                has_reported_thinking,
            };

            let mut just_finish = false;
            for call in &response.tool_calls {
                if call.tool_name == FINISH_TOOL {
                    just_finish = true;
                    history.push(Message::tool_result(call.call_id.clone(), "ok"));
                    continue;
                }
                match sl_tools::dispatch(&mut ctx, &call.tool_name, call.arguments.clone()).await {
                    Ok(output) => {
                        TraceEvent::ToolDispatched { tool_name: call.tool_name.clone(), ok: true }.emit();
                        history.push(Message::tool_result(call.call_id.clone(), output));
                    }
                    Err(e) => {
                        TraceEvent::ToolDispatched { tool_name: call.tool_name.clone(), ok: false }.emit();
                        return Err(e);
                    }
                }
            }
            has_reported_thinking = ctx.has_reported_thinking;
            skills = ctx.skills;

            let remaining = config.max_contexts_per_agent_run.saturating_sub(drained.len());
            let new_items = if remaining > 0 {
                kv.drain_pending(&project, &space, Some(remaining as i64)).await?
            } else {
                Vec::new()
            };

            iteration += 1;

            if !new_items.is_empty() {
                max_iterations += config.extra_iterations_per_context_batch;
                just_finish = false;
                let skill_ids = store.get_learning_space_skill_ids(learning_space_id).await?;
                skills = SkillSnapshot::from_skills(store.get_skills_info(&skill_ids).await?);
                TraceEvent::SkillsRefreshed {
                    learning_space_id: space.clone(),
                    skill_count: skills.len(),
                }
                .emit();
                history.push(prompt::pack_new_context_message(&new_items, &skills));
                drained.extend(new_items);
            }

            TraceEvent::AgentIterationCompleted {
                learning_space_id: space.clone(),
                iteration,
                max_iterations,
                tool_calls: response.tool_calls.len(),
            }
            .emit();

            if lock_ttl_seconds > 0 {
                let renewed = kv.renew_lock(&project, lock_key, lock_ttl_seconds).await?;
                TraceEvent::LockRenewed {
                    key: lock_key.to_string(),
                    ttl_seconds: lock_ttl_seconds,
                    ok: renewed,
                }
                .emit();
                if !renewed {
                    tracing::warn!(key = %lock_key, "lock renewal failed, continuing on the consumer timeout as the safety net");
                }
            }

            if just_finish {
                break;
            }
        }
        Ok(())
    }
    .await;

    match run {
        Ok(()) => {
            let session_ids: Vec<Uuid> = drained.iter().map(|d| d.session_id).collect();
            TraceEvent::AgentRunSucceeded {
                learning_space_id: space,
                sessions_processed: session_ids.len(),
            }
            .emit();
            Ok(AgentLoopOutcome { processed_session_ids: session_ids })
        }
        Err(e) => {
            for item in &drained {
                kv.push_pending(&project, &space, item).await?;
            }
            TraceEvent::AgentRunFailed {
                learning_space_id: space,
                reason: e.to_string(),
                re_pushed: drained.len(),
            }
            .emit();
            Err(e)
        }
    }
}
