use std::io;
use std::path::PathBuf;

use crate::skill::SkillId;

#[derive(Debug, thiserror::Error)]
pub enum SkillTreeError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {what}: {source}")]
    Parse {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("skill with an empty id")]
    EmptyId,

    #[error("duplicate skill id `{0}`")]
    DuplicateId(SkillId),

    #[error("skill `{0}` is not mounted")]
    NotMounted(SkillId),

    #[error("unknown skill `{0}`")]
    UnknownSkill(SkillId),
}

pub type Result<T, E = SkillTreeError> = std::result::Result<T, E>;
