use skilltree::settings::TreeSettings;
use skilltree::{MemoryStore, NodeState, Skill, SkillId, SkillStore, SkillTree};

fn id(s: &str) -> SkillId {
    SkillId::from(s)
}

fn forest() -> Vec<Skill> {
    vec![
        Skill::new("root", "Root").with_children(vec![
            Skill::new("left", "Left").with_children(vec![
                Skill::new("left-a", "Left A"),
                Skill::new("left-b", "Left B"),
            ]),
            Skill::new("right", "Right"),
        ]),
        Skill::new("other", "Other Root"),
    ]
}

fn tree() -> SkillTree {
    SkillTree::new(&forest(), &TreeSettings::default())
}

#[test]
fn roots_unlock_on_first_pass() {
    let tree = tree();
    let mut store = MemoryStore::new();

    tree.sync(&mut store);

    assert_eq!(store.get(&id("root")), NodeState::Unlocked);
    assert_eq!(store.get(&id("other")), NodeState::Unlocked);
    // Children of an unlocked (not selected) parent stay locked.
    assert_eq!(store.get(&id("left")), NodeState::Locked);
    assert_eq!(store.get(&id("left-a")), NodeState::Locked);
}

#[test]
fn selected_parent_unlocks_locked_child_without_touching_count() {
    let tree = tree();
    let mut store = MemoryStore::new();
    store.set(&id("root"), NodeState::Selected);
    store.increment_selected_count();

    tree.sync(&mut store);

    assert_eq!(store.get(&id("left")), NodeState::Unlocked);
    assert_eq!(store.get(&id("right")), NodeState::Unlocked);
    assert_eq!(store.get(&id("left-a")), NodeState::Locked);
    assert_eq!(store.selected_count(), 1);
}

#[test]
fn parent_deselection_locks_selected_child_and_decrements_once() {
    let tree = tree();
    let mut store = MemoryStore::new();
    tree.settle(&mut store);

    tree.toggle(&mut store, &id("root")).expect("root exists");
    tree.toggle(&mut store, &id("left")).expect("left exists");
    tree.toggle(&mut store, &id("left-a")).expect("left-a exists");
    assert_eq!(store.selected_count(), 3);
    assert_eq!(store.get(&id("left-b")), NodeState::Unlocked);

    // root: Selected -> Unlocked, so `left` loses its selection and everything below follows.
    tree.toggle(&mut store, &id("root")).expect("root exists");

    assert_eq!(store.get(&id("root")), NodeState::Unlocked);
    assert_eq!(store.get(&id("left")), NodeState::Locked);
    assert_eq!(store.get(&id("left-a")), NodeState::Locked);
    assert_eq!(store.get(&id("left-b")), NodeState::Locked);
    assert_eq!(store.get(&id("right")), NodeState::Locked);
    assert_eq!(store.selected_count(), 0);
    assert_eq!(store.count_selected(), 0);

    // Further passes are no-ops and never decrement again.
    assert_eq!(tree.sync(&mut store), 0);
    assert_eq!(store.selected_count(), 0);
}

#[test]
fn invariant_is_restored_from_any_starting_state() {
    let tree = tree();
    let mut store = MemoryStore::new();
    // An inconsistent snapshot: deep selections under a locked parent.
    store.set(&id("root"), NodeState::Locked);
    store.set(&id("left"), NodeState::Selected);
    store.set(&id("left-a"), NodeState::Selected);
    store.set(&id("right"), NodeState::Unlocked);
    store.increment_selected_count();
    store.increment_selected_count();

    tree.settle(&mut store);

    for seg in tree.segments() {
        let own = store.get(seg.id());
        for child in seg.children() {
            let state = store.get(child.id());
            if own != NodeState::Selected {
                assert_eq!(state, NodeState::Locked, "{} under {}", child.id(), seg.id());
            }
        }
    }
    assert_eq!(store.get(&id("root")), NodeState::Unlocked);
    assert_eq!(store.selected_count(), 0);
}

#[test]
fn locked_nodes_cannot_be_toggled() {
    let tree = tree();
    let mut store = MemoryStore::new();
    tree.settle(&mut store);

    assert!(!tree.toggle(&mut store, &id("left")).expect("left exists"));
    assert_eq!(store.get(&id("left")), NodeState::Locked);
    assert_eq!(store.selected_count(), 0);
}

#[test]
fn toggling_unknown_skill_is_an_error() {
    let tree = tree();
    let mut store = MemoryStore::new();
    let err = tree.toggle(&mut store, &id("missing")).unwrap_err();
    assert_eq!(err.to_string(), "unknown skill `missing`");
}

#[test]
fn settle_is_idempotent() {
    let tree = tree();
    let mut store = MemoryStore::new();
    store.set(&id("root"), NodeState::Selected);

    assert!(tree.settle(&mut store) > 0);
    let snapshot = store.clone();
    assert_eq!(tree.settle(&mut store), 0);
    assert_eq!(store, snapshot);
}
