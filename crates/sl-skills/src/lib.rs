mod snapshot;

pub use snapshot::SkillSnapshot;
pub use sl_domain::model::SkillInfo;
