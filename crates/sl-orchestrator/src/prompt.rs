use sl_domain::model::SkillLearnDistilled;
use sl_domain::tool::Message;
use sl_skills::SkillSnapshot;

const MAX_CONTEXT_CHARS: usize = 4_000;
const MAX_TOTAL_CHARS: usize = 40_000;

/// One labeled block of the packed prompt. Titles are never truncated,
/// only bodies.
pub struct Section {
    pub title: String,
    pub body: String,
}

/// Truncate a single section body to `max_chars`, keeping the head and
/// recording how much was cut.
pub fn truncate_per_file(body: &str, max_chars: usize) -> String {
    let len = body.chars().count();
    if len <= max_chars {
        return body.to_string();
    }
    let head: String = body.chars().take(max_chars).collect();
    format!("{head}\n...[truncated {} chars]", len - max_chars)
}

/// Shrink sections proportionally to their own size until the combined
/// body length fits under `max_total_chars`.
pub fn apply_total_cap(sections: Vec<Section>, max_total_chars: usize) -> Vec<Section> {
    let total: usize = sections.iter().map(|s| s.body.chars().count()).sum();
    if total <= max_total_chars || sections.is_empty() {
        return sections;
    }
    sections
        .into_iter()
        .map(|s| {
            let share = (s.body.chars().count() * max_total_chars / total.max(1)).max(1);
            Section {
                title: s.title,
                body: truncate_per_file(&s.body, share),
            }
        })
        .collect()
}

pub fn render_sections(sections: &[Section]) -> String {
    sections
        .iter()
        .map(|s| format!("## {}\n\n{}", s.title, s.body))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn system_prompt() -> String {
    "You turn completed conversational sessions into durable skills for this learning space. \
     Read the distilled context(s) below, decide whether they reveal a reusable skill the \
     learning space doesn't already have, and act: call report_thinking once to narrate your \
     reasoning, then create_skill or update_skill as needed. Call finish when there is nothing \
     more to do for the context(s) you've seen so far."
        .to_string()
}

/// Build the first user message of a run: the current skill index, the
/// live context that triggered this run ("Task Analysis"), and any
/// context already waiting in the pending queue at entry.
pub fn pack_initial_message(
    live: &SkillLearnDistilled,
    pending: &[SkillLearnDistilled],
    skills: &SkillSnapshot,
) -> Message {
    let mut sections = vec![
        Section { title: "Available Skills".into(), body: skills.render() },
        Section {
            title: "Task Analysis".into(),
            body: truncate_per_file(&live.distilled_context, MAX_CONTEXT_CHARS),
        },
    ];
    for (i, item) in pending.iter().enumerate() {
        sections.push(Section {
            title: format!("Pending Context {}", i + 1),
            body: truncate_per_file(&item.distilled_context, MAX_CONTEXT_CHARS),
        });
    }
    let sections = apply_total_cap(sections, MAX_TOTAL_CHARS);
    Message::user(render_sections(&sections))
}

/// Build the message describing contexts that arrived mid-run, after a
/// tool call may have changed the skill index.
pub fn pack_new_context_message(items: &[SkillLearnDistilled], skills: &SkillSnapshot) -> Message {
    let mut sections = vec![Section {
        title: "Available Skills (refreshed)".into(),
        body: skills.render(),
    }];
    for (i, item) in items.iter().enumerate() {
        sections.push(Section {
            title: format!("Newly Arrived Context {}", i + 1),
            body: truncate_per_file(&item.distilled_context, MAX_CONTEXT_CHARS),
        });
    }
    let sections = apply_total_cap(sections, MAX_TOTAL_CHARS);
    Message::user(render_sections(&sections))
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

    #[test]
    fn truncate_per_file_is_noop_under_limit() {
        assert_eq!(truncate_per_file("short", 100), "short");
    }

    #[test]
    fn truncate_per_file_cuts_and_annotates() {
        let body = "a".repeat(10);
        let out = truncate_per_file(&body, 4);
        assert!(out.starts_with("aaaa"));
        assert!(out.contains("truncated 6 chars"));
    }

    #[test]
    fn apply_total_cap_is_noop_under_budget() {
        let sections = vec![Section { title: "A".into(), body: "x".repeat(10) }];
        let out = apply_total_cap(sections, 1000);
        assert_eq!(out[0].body.chars().count(), 10);
    }

    #[test]
    fn apply_total_cap_shrinks_when_over_budget() {
        let sections = vec![
            Section { title: "A".into(), body: "a".repeat(100) },
            Section { title: "B".into(), body: "b".repeat(100) },
        ];
        let out = apply_total_cap(sections, 50);
        let total: usize = out.iter().map(|s| s.body.chars().count()).sum();
        assert!(total <= 70, "expected shrinkage close to budget, got {total}");
    }

    #[test]
    fn pack_initial_message_includes_live_and_pending_contexts() {
        let skills = SkillSnapshot::default();
        let live = item("live context");
        let pending = vec![item("pending one"), item("pending two")];
        let msg = pack_initial_message(&live, &pending, &skills);
        let text = msg.content.extract_all_text();
        assert!(text.contains("Task Analysis"));
        assert!(text.contains("live context"));
        assert!(text.contains("Pending Context 1"));
        assert!(text.contains("Pending Context 2"));
        assert!(text.contains("pending one"));
        assert!(text.contains("pending two"));
    }
}
