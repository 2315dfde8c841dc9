use crate::skill::SkillId;
use crate::state::{NodeState, SkillStore};

/// Flips a node between `Unlocked` and `Selected`, keeping the selected counter in step.
///
/// Locked nodes cannot be selected. Returns `true` if the store changed; callers should run a
/// synchronization pass afterwards so descendants follow.
pub fn toggle_selection<S: SkillStore + ?Sized>(store: &mut S, id: &SkillId) -> bool {
    match store.get(id) {
        NodeState::Locked => false,
        NodeState::Unlocked => {
            store.set(id, NodeState::Selected);
            store.increment_selected_count();
            tracing::debug!(skill = %id, count = store.selected_count(), "skill selected");
            true
        }
        NodeState::Selected => {
            store.set(id, NodeState::Unlocked);
            store.decrement_selected_count();
            tracing::debug!(skill = %id, count = store.selected_count(), "skill deselected");
            true
        }
    }
}
