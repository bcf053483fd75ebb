/// An exchange / routing key / queue triple bound together at startup.
///
/// Declaring the binding is idempotent, so both the publisher side
/// (distillation) and the consumer side (the agent) can call
/// `AmqpBus::declare` against the same `Binding` without caring who
/// runs first.
#[derive(Debug, Clone, Copy)]
pub struct Binding {
    pub exchange: &'static str,
    pub routing_key: &'static str,
    pub queue: &'static str,
}

/// Close-session handoff: one closed conversational session awaiting
/// distillation per message.
pub const DISTILL_BINDING: Binding = Binding {
    exchange: "learning_skill",
    routing_key: "learning.skill.distill",
    queue: "learning.skill.distill.entry",
};

/// Skill-agent trigger: the body is the live distilled context that
/// should be folded into its learning space's skills right now. Any
/// other context waiting for the same space rides along via the
/// pending queue in `sl-kv`, not this message.
pub const AGENT_BINDING: Binding = Binding {
    exchange: "learning_skill",
    routing_key: "learning.skill.agent",
    queue: "learning.skill.agent.entry",
};
