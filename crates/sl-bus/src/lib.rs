mod binding;
mod bus;

pub use binding::{Binding, AGENT_BINDING, DISTILL_BINDING};
pub use bus::{AmqpBus, BusConsumer, Delivery, MessageBus};
