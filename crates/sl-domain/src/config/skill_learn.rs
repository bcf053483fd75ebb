use serde::{Deserialize, Serialize};

/// Tunables governing the skill-agent's bounded multi-turn loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillLearnConfig {
    /// Upper bound on distilled contexts folded into a single agent run,
    /// across both the entry drain and every mid-run drain combined.
    #[serde(default = "d_max_contexts")]
    pub max_contexts_per_agent_run: usize,
    /// Extra loop iterations granted each time a mid-run drain brings in
    /// at least one new context.
    #[serde(default = "d_extra_iters")]
    pub extra_iterations_per_context_batch: u32,
    /// Starting iteration budget for a fresh agent run.
    #[serde(default = "d_max_iterations")]
    pub agent_max_iterations: u32,
    /// TTL applied to the per-session buffer timer that coalesces rapid
    /// distillation arrivals before they're handed to the agent.
    #[serde(default = "d_buffer_timer")]
    pub buffer_timer_seconds: u64,
    /// Root directory skill artifacts (markdown bodies) are written under,
    /// one subdirectory per learning space.
    #[serde(default = "d_skills_root")]
    pub skills_root: String,
}

impl Default for SkillLearnConfig {
    fn default() -> Self {
        Self {
            max_contexts_per_agent_run: d_max_contexts(),
            extra_iterations_per_context_batch: d_extra_iters(),
            agent_max_iterations: d_max_iterations(),
            buffer_timer_seconds: d_buffer_timer(),
            skills_root: d_skills_root(),
        }
    }
}

impl SkillLearnConfig {
    /// Clamp to sane bounds; guards against a zero/huge value reaching the
    /// agent loop from a hand-edited config file.
    pub fn clamped(self) -> Self {
        Self {
            max_contexts_per_agent_run: self.max_contexts_per_agent_run.clamp(1, 500),
            extra_iterations_per_context_batch: self.extra_iterations_per_context_batch.clamp(0, 50),
            agent_max_iterations: self.agent_max_iterations.clamp(1, 200),
            buffer_timer_seconds: self.buffer_timer_seconds.clamp(1, 3600),
            skills_root: self.skills_root,
        }
    }
}

fn d_skills_root() -> String {
    "./data/skills".into()
}

fn d_max_contexts() -> usize {
    20
}

fn d_extra_iters() -> u32 {
    3
}

fn d_max_iterations() -> u32 {
    5
}

fn d_buffer_timer() -> u64 {
    10
}
