//! Parent-driven state propagation.

use crate::skill::SkillId;
use crate::state::{NodeState, SkillStore};

/// Outcome of one synchronization step for a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: NodeState,
    /// The node lost its selection because its parent did.
    pub deselected: bool,
}

/// A node with no parent behaves as if its parent were selected.
pub fn parent_is_selected(parent: Option<NodeState>) -> bool {
    parent.is_none_or(|state| state == NodeState::Selected)
}

/// Transition table for a node given its parent's state. `None` means no change.
pub fn transition(current: NodeState, parent: Option<NodeState>) -> Option<Transition> {
    let parent_selected = parent_is_selected(parent);
    match (current, parent_selected) {
        (NodeState::Selected, false) => Some(Transition {
            next: NodeState::Locked,
            deselected: true,
        }),
        (NodeState::Unlocked, false) => Some(Transition {
            next: NodeState::Locked,
            deselected: false,
        }),
        (NodeState::Locked, true) => Some(Transition {
            next: NodeState::Unlocked,
            deselected: false,
        }),
        (NodeState::Locked, false) | (NodeState::Unlocked | NodeState::Selected, true) => None,
    }
}

/// Applies one synchronization step to `id`. Returns `true` if the store changed.
pub fn sync_node<S: SkillStore + ?Sized>(store: &mut S, id: &SkillId, parent: Option<NodeState>) -> bool {
    let current = store.get(id);
    let Some(step) = transition(current, parent) else {
        return false;
    };
    if step.deselected {
        store.decrement_selected_count();
    }
    store.set(id, step.next);
    tracing::debug!(
        skill = %id,
        from = current.as_str(),
        to = step.next.as_str(),
        "skill state synchronized"
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryStore;

    const ALL: [NodeState; 3] = [NodeState::Locked, NodeState::Unlocked, NodeState::Selected];

    #[test]
    fn non_selected_parent_always_ends_locked() {
        for parent in [NodeState::Locked, NodeState::Unlocked] {
            for current in ALL {
                let next = transition(current, Some(parent)).map_or(current, |t| t.next);
                assert_eq!(next, NodeState::Locked, "{current:?} under {parent:?}");
            }
        }
    }

    #[test]
    fn selected_parent_unlocks_locked_child_only() {
        assert_eq!(
            transition(NodeState::Locked, Some(NodeState::Selected)),
            Some(Transition {
                next: NodeState::Unlocked,
                deselected: false
            })
        );
        assert_eq!(transition(NodeState::Unlocked, Some(NodeState::Selected)), None);
        assert_eq!(transition(NodeState::Selected, Some(NodeState::Selected)), None);
    }

    #[test]
    fn roots_behave_as_if_parent_were_selected() {
        for current in ALL {
            assert_eq!(
                transition(current, None),
                transition(current, Some(NodeState::Selected))
            );
        }
    }

    #[test]
    fn only_losing_selection_marks_deselected() {
        let marked: Vec<_> = ALL
            .iter()
            .flat_map(|c| ALL.iter().map(move |p| transition(*c, Some(*p))))
            .flatten()
            .filter(|t| t.deselected)
            .collect();
        assert_eq!(marked.len(), 2);
    }

    #[test]
    fn sync_node_decrements_counter_on_deselection() {
        let id = SkillId::from("child");
        let mut store = MemoryStore::new();
        store.set(&id, NodeState::Selected);
        store.increment_selected_count();

        assert!(sync_node(&mut store, &id, Some(NodeState::Locked)));
        assert_eq!(store.get(&id), NodeState::Locked);
        assert_eq!(store.selected_count(), 0);

        assert!(!sync_node(&mut store, &id, Some(NodeState::Locked)));
        assert_eq!(store.selected_count(), 0);
    }
}
