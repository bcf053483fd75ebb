use std::collections::HashMap;

use sl_domain::model::SkillInfo;

/// The set of skills a single agent run sees, keyed by name. Rebuilt
/// wholesale on refresh rather than mutated in place — a mid-run refresh
/// after a tool creates or edits a skill must fully replace this, not
/// patch it, since deletions need to disappear too.
#[derive(Debug, Clone, Default)]
pub struct SkillSnapshot {
    by_name: HashMap<String, SkillInfo>,
}

impl SkillSnapshot {
    pub fn from_skills(skills: Vec<SkillInfo>) -> Self {
        Self {
            by_name: skills.into_iter().map(|s| (s.name.clone(), s)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn get(&self, name: &str) -> Option<&SkillInfo> {
        self.by_name.get(name)
    }

    /// Render the "Available Skills" block shown to the agent.
    pub fn render(&self) -> String {
        if self.by_name.is_empty() {
            return "(No skills in this learning space yet)".into();
        }
        let mut names: Vec<&String> = self.by_name.keys().collect();
        names.sort();
        names
            .into_iter()
            .map(|name| {
                let skill = &self.by_name[name];
                format!("- **{}**: {}", skill.name, skill.description)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn skill(name: &str, description: &str) -> SkillInfo {
        SkillInfo {
            id: Uuid::new_v4(),
            disk_id: name.to_lowercase(),
            name: name.into(),
            description: description.into(),
            file_paths: vec![],
        }
    }

    #[test]
    fn empty_snapshot_renders_placeholder() {
        let snap = SkillSnapshot::from_skills(vec![]);
        assert_eq!(snap.render(), "(No skills in this learning space yet)");
    }

    #[test]
    fn renders_sorted_bullet_list() {
        let snap = SkillSnapshot::from_skills(vec![
            skill("Zebra Skill", "does z things"),
            skill("Alpha Skill", "does a things"),
        ]);
        let rendered = snap.render();
        let alpha_pos = rendered.find("Alpha").unwrap();
        let zebra_pos = rendered.find("Zebra").unwrap();
        assert!(alpha_pos < zebra_pos);
        assert!(rendered.contains("- **Alpha Skill**: does a things"));
    }

    #[test]
    fn get_by_name() {
        let snap = SkillSnapshot::from_skills(vec![skill("Foo", "bar")]);
        assert!(snap.get("Foo").is_some());
        assert!(snap.get("Missing").is_none());
    }
}
