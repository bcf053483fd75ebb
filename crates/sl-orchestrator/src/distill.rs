use sl_domain::error::Result;
use sl_domain::tool::Message;
use sl_llm::{ChatRequest, LlmProvider};

const NOT_ACTIONABLE: &str = "NOT_ACTIONABLE";

/// System prompt for the single LM call that turns a closed conversation
/// into a distilled context, or decides there's nothing worth learning.
pub fn system_prompt() -> String {
    "You read one closed conversation between a user and an agent and decide whether it \
     contains a reusable lesson worth turning into a skill later. If it does, write a terse, \
     self-contained summary of what was asked and how it was solved, specific enough that a \
     future agent could act on it without re-reading the original conversation. If there is \
     nothing worth learning (small talk, a one-off question with no repeatable pattern, an \
     abandoned task), respond with exactly NOT_ACTIONABLE and nothing else."
        .to_string()
}

/// Invoke the distillation pipeline: one LM call plus deterministic
/// packaging. `content` is the raw transcript assembled upstream by the
/// close-session path. Returns `None` when the model judges the session
/// not worth learning from.
pub async fn distill(llm: &dyn LlmProvider, content: &str) -> Result<Option<String>> {
    let request = ChatRequest::new(system_prompt(), vec![Message::user(content.to_string())]);
    let response = llm.complete(request).await?;
    let text = response.content.unwrap_or_default();
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == NOT_ACTIONABLE {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}
