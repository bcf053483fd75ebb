mod ctx;
mod registry;
mod tools;

pub use ctx::SkillLearnerCtx;
pub use registry::{dispatch, tool_definitions};
pub use tools::FINISH_TOOL;
