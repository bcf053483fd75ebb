use serde::Deserialize;
use serde_json::Value;
use sl_domain::error::{Error, Result};
use sl_domain::model::SkillInfo;
use uuid::Uuid;

use crate::ctx::SkillLearnerCtx;

/// Sentinel tool name the LLM uses to end its turn. It is intentionally
/// absent from the dispatch registry — the orchestrator intercepts it
/// before ever looking a tool up by name.
pub const FINISH_TOOL: &str = "finish";

#[derive(Deserialize)]
struct ReportThinkingArgs {
    thinking: String,
}

/// Record that the agent has narrated its reasoning for this run. Every
/// other tool's log line is suppressed once this has fired once, so the
/// first call is the only one that's chatty.
pub async fn report_thinking(ctx: &mut SkillLearnerCtx, arguments: Value) -> Result<String> {
    let args: ReportThinkingArgs = serde_json::from_value(arguments)?;
    tracing::info!(thinking = %args.thinking, "skill learner thinking");
    ctx.has_reported_thinking = true;
    Ok("thinking recorded".into())
}

#[derive(Deserialize)]
struct CreateSkillArgs {
    name: String,
    description: String,
    content: String,
}

/// Create a brand-new skill: writes the markdown body to disk, registers
/// the row, and folds it into the in-run snapshot so a later tool call
/// in the same iteration can see it immediately.
pub async fn create_skill(ctx: &mut SkillLearnerCtx, arguments: Value) -> Result<String> {
    let args: CreateSkillArgs = serde_json::from_value(arguments)?;

    if !ctx.has_reported_thinking {
        return Err(Error::Tool {
            name: "create_skill".into(),
            message: "must call report_thinking before creating a skill".into(),
        });
    }

    if ctx.skills.get(&args.name).is_some() {
        return Err(Error::Tool {
            name: "create_skill".into(),
            message: format!("skill \"{}\" already exists — use update_skill", args.name),
        });
    }

    let disk_id = slugify(&args.name);
    let dir = ctx.skill_dir();
    tokio::fs::create_dir_all(&dir).await?;
    let file_path = dir.join(format!("{disk_id}.md"));
    tokio::fs::write(&file_path, &args.content).await?;

    let skill = SkillInfo {
        id: Uuid::new_v4(),
        disk_id,
        name: args.name.clone(),
        description: args.description,
        file_paths: vec![file_path.to_string_lossy().into_owned()],
    };
    ctx.store.upsert_skill(ctx.learning_space_id, &skill).await?;

    let summary = format!("created skill \"{}\"", skill.name);
    ctx.skills = sl_skills::SkillSnapshot::from_skills(
        ctx.store
            .get_skills_info(&ctx.store.get_learning_space_skill_ids(ctx.learning_space_id).await?)
            .await?,
    );
    Ok(summary)
}

#[derive(Deserialize)]
struct UpdateSkillArgs {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

/// Update an existing skill's description and/or body in place.
pub async fn update_skill(ctx: &mut SkillLearnerCtx, arguments: Value) -> Result<String> {
    let args: UpdateSkillArgs = serde_json::from_value(arguments)?;

    if !ctx.has_reported_thinking {
        return Err(Error::Tool {
            name: "update_skill".into(),
            message: "must call report_thinking before updating a skill".into(),
        });
    }

    let existing = ctx
        .skills
        .get(&args.name)
        .ok_or_else(|| Error::Tool {
            name: "update_skill".into(),
            message: format!("skill \"{}\" not found — use create_skill", args.name),
        })?
        .clone();

    let mut updated = existing;
    if let Some(description) = args.description {
        updated.description = description;
    }
    if let Some(content) = &args.content {
        let dir = ctx.skill_dir();
        tokio::fs::create_dir_all(&dir).await?;
        let file_path = dir.join(format!("{}.md", updated.disk_id));
        tokio::fs::write(&file_path, content).await?;
        updated.file_paths = vec![file_path.to_string_lossy().into_owned()];
    }

    ctx.store.upsert_skill(ctx.learning_space_id, &updated).await?;
    let summary = format!("updated skill \"{}\"", updated.name);
    ctx.skills = sl_skills::SkillSnapshot::from_skills(
        ctx.store
            .get_skills_info(&ctx.store.get_learning_space_skill_ids(ctx.learning_space_id).await?)
            .await?,
    );
    Ok(summary)
}

fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
