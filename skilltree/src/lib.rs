pub mod error;
pub mod layout;
pub mod segment;
pub mod selection;
pub mod serde_duration;
pub mod settings;
pub mod skill;
pub mod state;
pub mod sync;
pub mod tree;

pub use error::{Result, SkillTreeError};
pub use segment::{ChildPosition, ParentPosition, SkillAction, SkillTreeSegment};
pub use skill::{Skill, SkillId};
pub use state::{MemoryStore, NodeState, SkillStore};
pub use tree::SkillTree;
