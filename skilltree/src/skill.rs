use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkillTreeError};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(String);

impl SkillId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SkillId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One node of the designer-authored skill forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: SkillId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(default)]
    pub children: Vec<Skill>,
}

impl Skill {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: SkillId::new(id),
            title: title.into(),
            tooltip: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Skill>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Skill files are either a bare array of roots or `{ "skills": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SkillFile {
    Roots(Vec<Skill>),
    Wrapped { skills: Vec<Skill> },
}

impl SkillFile {
    fn into_roots(self) -> Vec<Skill> {
        match self {
            Self::Roots(skills) | Self::Wrapped { skills } => skills,
        }
    }
}

pub fn parse_skills(json: &str) -> Result<Vec<Skill>> {
    let file: SkillFile = serde_json::from_str(json).map_err(|source| SkillTreeError::Parse {
        what: "skill data".to_string(),
        source,
    })?;
    let roots = file.into_roots();
    validate(&roots)?;
    Ok(roots)
}

pub fn load_skills(path: &Path) -> Result<Vec<Skill>> {
    let text = fs::read_to_string(path).map_err(|source| SkillTreeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_skills(&text)
}

/// The sample forest bundled with the crate.
pub fn default_skills() -> Vec<Skill> {
    // The asset is checked by `bundled_skills_parse`; an empty forest is the fallback.
    parse_skills(include_str!("../assets/skills.json")).unwrap_or_default()
}

/// Checks that every id is non-empty and unique across the forest.
pub fn validate(roots: &[Skill]) -> Result<()> {
    let mut seen = HashSet::new();
    for (skill, _) in walk(roots) {
        if skill.id.as_str().trim().is_empty() {
            return Err(SkillTreeError::EmptyId);
        }
        if !seen.insert(&skill.id) {
            return Err(SkillTreeError::DuplicateId(skill.id.clone()));
        }
    }
    Ok(())
}

/// Pre-order walk of the forest, yielding each skill with its parent.
pub fn walk(roots: &[Skill]) -> Vec<(&Skill, Option<&Skill>)> {
    fn visit<'a>(skill: &'a Skill, parent: Option<&'a Skill>, out: &mut Vec<(&'a Skill, Option<&'a Skill>)>) {
        out.push((skill, parent));
        for child in &skill.children {
            visit(child, Some(skill), out);
        }
    }

    let mut out = Vec::new();
    for root in roots {
        visit(root, None, &mut out);
    }
    out
}

pub fn find<'a>(roots: &'a [Skill], id: &SkillId) -> Option<&'a Skill> {
    walk(roots).into_iter().map(|(s, _)| s).find(|s| &s.id == id)
}
