use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkillTreeError};
use crate::skill::SkillId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    #[default]
    Locked,
    Unlocked,
    Selected,
}

impl NodeState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
            Self::Selected => "selected",
        }
    }
}

/// Read/write access to node states and the selected counter.
///
/// Every segment operation takes the store explicitly; nothing reaches for a global.
pub trait SkillStore {
    /// Missing entries read as [`NodeState::Locked`].
    fn get(&self, id: &SkillId) -> NodeState;
    fn set(&mut self, id: &SkillId, state: NodeState);

    fn selected_count(&self) -> u32;
    fn increment_selected_count(&mut self);
    /// Saturates at zero.
    fn decrement_selected_count(&mut self);
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStore {
    #[serde(default)]
    states: BTreeMap<SkillId, NodeState>,
    #[serde(default)]
    selected_count: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SkillId, NodeState)> {
        self.states.iter().map(|(id, state)| (id, *state))
    }

    /// Number of entries currently `Selected`, counted from the map rather than the counter.
    pub fn count_selected(&self) -> u32 {
        let selected = self
            .states
            .values()
            .filter(|s| **s == NodeState::Selected)
            .count();
        u32::try_from(selected).unwrap_or(u32::MAX)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|source| SkillTreeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| SkillTreeError::Parse {
            what: path.display().to_string(),
            source,
        })
    }

    /// Loads `path`, or starts empty if it does not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let io_err = |source: std::io::Error| SkillTreeError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| SkillTreeError::Parse {
            what: "store snapshot".to_string(),
            source,
        })?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)
    }
}

impl SkillStore for MemoryStore {
    fn get(&self, id: &SkillId) -> NodeState {
        self.states.get(id).copied().unwrap_or_default()
    }

    fn set(&mut self, id: &SkillId, state: NodeState) {
        self.states.insert(id.clone(), state);
    }

    fn selected_count(&self) -> u32 {
        self.selected_count
    }

    fn increment_selected_count(&mut self) {
        self.selected_count = self.selected_count.saturating_add(1);
    }

    fn decrement_selected_count(&mut self) {
        self.selected_count = self.selected_count.saturating_sub(1);
    }
}
