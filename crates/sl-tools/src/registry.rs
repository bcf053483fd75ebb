use serde_json::{json, Value};
use sl_domain::error::{Error, Result};
use sl_domain::tool::ToolDefinition;

use crate::ctx::SkillLearnerCtx;
use crate::tools::{create_skill, report_thinking, update_skill, FINISH_TOOL};

/// Every tool the skill-learner agent may call, excluding `finish` — the
/// orchestrator intercepts that sentinel before dispatch ever sees it.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "report_thinking".into(),
            description: "Narrate your reasoning about what skill(s) this context implies \
                before taking any mutating action."
                .into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "thinking": { "type": "string" }
                },
                "required": ["thinking"]
            }),
        },
        ToolDefinition {
            name: "create_skill".into(),
            description: "Create a new skill in this learning space.".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "description": { "type": "string" },
                    "content": { "type": "string", "description": "Full markdown body of the skill." }
                },
                "required": ["name", "description", "content"]
            }),
        },
        ToolDefinition {
            name: "update_skill".into(),
            description: "Update an existing skill's description and/or body.".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "description": { "type": "string" },
                    "content": { "type": "string" }
                },
                "required": ["name"]
            }),
        },
    ]
}

/// Dispatch a single tool call by name. Returns `Err(UnknownTool)` for
/// any name that isn't `finish` and isn't one of the registered tools —
/// callers are expected to have already special-cased `finish`.
pub async fn dispatch(ctx: &mut SkillLearnerCtx, tool_name: &str, arguments: Value) -> Result<String> {
    match tool_name {
        "report_thinking" => report_thinking(ctx, arguments).await,
        "create_skill" => create_skill(ctx, arguments).await,
        "update_skill" => update_skill(ctx, arguments).await,
        FINISH_TOOL => Err(Error::Other(
            "finish must be intercepted by the caller, not dispatched".into(),
        )),
        other => Err(Error::UnknownTool(other.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_is_not_a_registered_definition() {
        assert!(tool_definitions().iter().all(|t| t.name != FINISH_TOOL));
    }

    #[test]
    fn definitions_cover_every_dispatchable_name() {
        let names: Vec<&str> = tool_definitions().iter().map(|t| t.name.as_str()).collect();
        assert!(names.contains(&"report_thinking"));
        assert!(names.contains(&"create_skill"));
        assert!(names.contains(&"update_skill"));
    }
}
