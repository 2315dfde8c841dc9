use engine::geometry::{ScrollOffset, Viewport};
use engine::raster::{Palette, frame_hash};
use engine::resize::ResizeListeners;
use engine::view_tree::Tone;
use skilltree::layout::TieredLayout;
use skilltree::settings::TreeSettings;
use skilltree::skill::default_skills;
use skilltree::{
    ChildPosition, MemoryStore, NodeState, ParentPosition, SkillAction, SkillId, SkillStore, SkillTree,
    SkillTreeSegment,
};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;

fn id(s: &str) -> SkillId {
    SkillId::from(s)
}

fn mounted_sample(scroll: ScrollOffset) -> (SkillTree, MemoryStore) {
    let skills = default_skills();
    let settings = TreeSettings::default();
    let viewport = Viewport::new(WIDTH as f32, HEIGHT as f32).with_scroll(scroll);
    let layout = TieredLayout::new(&skills, settings.layout, viewport);

    let mut tree = SkillTree::new(&skills, &settings);
    let mut listeners = ResizeListeners::new();
    tree.mount(&mut listeners, &layout).expect("sample forest mounts");

    let mut store = MemoryStore::new();
    tree.settle(&mut store);
    (tree, store)
}

#[test]
fn one_edge_per_non_root_node_from_parent_bottom_to_child_top() {
    let (tree, store) = mounted_sample(ScrollOffset::ZERO);
    let view = tree.render(&store);

    let segments = tree.segments();
    assert_eq!(view.glyphs().count(), segments.len());
    assert_eq!(view.edges().count(), segments.len() - tree.roots().len());

    // Edges are emitted in pre-order of the child they lead to.
    fn expected(seg: &SkillTreeSegment, out: &mut Vec<(ParentPosition, ChildPosition)>) {
        for child in seg.children() {
            out.push((seg.parent_anchor(), child.position()));
            expected(child, out);
        }
    }
    let mut anchors = Vec::new();
    for root in tree.roots() {
        expected(root, &mut anchors);
    }

    for (edge, (from, to)) in view.edges().zip(&anchors) {
        assert_eq!(edge.start, (from.center.round() as i32, from.bottom.round() as i32));
        assert_eq!(edge.end, (to.center.round() as i32, to.top.round() as i32));
        assert!(edge.start.1 < edge.end.1, "edges run downwards");
    }
}

#[test]
fn draw_order_is_edge_then_glyph_then_children() {
    let (tree, store) = mounted_sample(ScrollOffset::ZERO);
    let view = tree.render(&store);

    let kinds: Vec<&str> = view
        .nodes
        .iter()
        .take(4)
        .map(|n| match n {
            engine::view_tree::ViewNode::Glyph(_) => "glyph",
            engine::view_tree::ViewNode::Edge(_) => "edge",
        })
        .collect();
    // root glyph, then the first child's edge and glyph, then the grandchild's edge.
    assert_eq!(kinds, vec!["glyph", "edge", "glyph", "edge"]);
}

#[test]
fn tones_follow_node_state() {
    let (tree, mut store) = mounted_sample(ScrollOffset::ZERO);
    tree.toggle(&mut store, &id("foundations")).expect("root exists");
    let view = tree.render(&store);

    let tone_of = |wanted: &str| {
        view.glyphs()
            .find(|g| g.action == SkillAction::Toggle(id(wanted)))
            .map(|g| g.tone)
    };
    assert_eq!(tone_of("foundations"), Some(Tone::Active));
    assert_eq!(tone_of("arcana"), Some(Tone::Available));
    assert_eq!(tone_of("meteor"), Some(Tone::Muted));
}

#[test]
fn click_on_glyph_toggles_the_node() {
    let (tree, mut store) = mounted_sample(ScrollOffset::ZERO);
    let view = tree.render(&store);
    let root = tree
        .find(&id("foundations"))
        .and_then(|s| s.page_box())
        .expect("root is measured");

    let x = root.center_x() as u32;
    let y = (root.top + root.height / 2.0) as u32;
    let hit = tree.click(&mut store, &view, x, y).expect("toggle succeeds");
    assert_eq!(hit, Some(id("foundations")));
    assert_eq!(store.get(&id("foundations")), NodeState::Selected);
    assert_eq!(store.get(&id("swordplay")), NodeState::Unlocked);

    assert_eq!(tree.click(&mut store, &view, 0, 0).expect("miss is fine"), None);
}

#[test]
fn rendering_is_deterministic_and_scroll_independent() {
    let palette = Palette::default();
    let (tree, store) = mounted_sample(ScrollOffset::ZERO);
    let first = frame_hash(tree.rasterize(&store, WIDTH, HEIGHT, &palette).frame());
    let second = frame_hash(tree.rasterize(&store, WIDTH, HEIGHT, &palette).frame());
    assert_eq!(first, second);

    let (scrolled, scrolled_store) = mounted_sample(ScrollOffset::new(0.0, 75.0));
    let third = frame_hash(
        scrolled
            .rasterize(&scrolled_store, WIDTH, HEIGHT, &palette)
            .frame(),
    );
    assert_eq!(first, third);
}

#[test]
fn selection_changes_the_frame() {
    let palette = Palette::default();
    let (tree, mut store) = mounted_sample(ScrollOffset::ZERO);
    let before = frame_hash(tree.rasterize(&store, WIDTH, HEIGHT, &palette).frame());

    tree.toggle(&mut store, &id("foundations")).expect("root exists");
    let after = frame_hash(tree.rasterize(&store, WIDTH, HEIGHT, &palette).frame());
    assert_ne!(before, after);
}
