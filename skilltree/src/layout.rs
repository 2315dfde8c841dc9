//! Where node geometry comes from.
//!
//! Segments never compute their own placement; they ask a [`LayoutHost`] for the box an
//! element occupies, the same way a browser component reads its bounding client rect.

use std::collections::HashMap;

use engine::geometry::{ClientRect, ScrollOffset, Viewport};

use crate::settings::LayoutSettings;
use crate::skill::{Skill, SkillId};

pub trait LayoutHost {
    /// Viewport-relative box of a mounted node, or `None` if the host does not know it.
    fn bounding_client_rect(&self, id: &SkillId) -> Option<ClientRect>;
    fn viewport(&self) -> Viewport;
}

/// Headless host that lays the forest out in rows: one row per depth, leaves in consecutive
/// slots, parents centred over their children, everything centred in the viewport.
#[derive(Debug, Clone)]
pub struct TieredLayout {
    settings: LayoutSettings,
    viewport: Viewport,
    /// Unshifted page boxes; the horizontal centring offset is applied on read.
    boxes: HashMap<SkillId, ClientRect>,
    content_width: f32,
}

impl TieredLayout {
    pub fn new(roots: &[Skill], settings: LayoutSettings, viewport: Viewport) -> Self {
        let mut layout = Self {
            settings,
            viewport,
            boxes: HashMap::new(),
            content_width: 0.0,
        };
        let mut next_slot = 0usize;
        for root in roots {
            layout.place(root, 0, &mut next_slot);
        }
        let slot_w = settings.node_width + settings.horizontal_gap;
        layout.content_width = if next_slot == 0 {
            0.0
        } else {
            next_slot as f32 * slot_w - settings.horizontal_gap
        };
        layout
    }

    pub fn content_width(&self) -> f32 {
        self.content_width
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    pub fn scroll_to(&mut self, scroll: ScrollOffset) {
        self.viewport.scroll = scroll;
    }

    /// Forgets a node, as if its element had been removed from the page.
    pub fn detach(&mut self, id: &SkillId) -> bool {
        self.boxes.remove(id).is_some()
    }

    /// Page-space box of a node.
    pub fn page_rect(&self, id: &SkillId) -> Option<ClientRect> {
        let offset = ((self.viewport.width - self.content_width) / 2.0).max(0.0);
        self.boxes.get(id).map(|r| ClientRect {
            left: r.left + offset,
            ..*r
        })
    }

    /// Returns the horizontal centre of the placed subtree.
    fn place(&mut self, skill: &Skill, depth: usize, next_slot: &mut usize) -> f32 {
        let s = self.settings;
        let center = if skill.children.is_empty() {
            let slot = *next_slot;
            *next_slot += 1;
            slot as f32 * (s.node_width + s.horizontal_gap) + s.node_width / 2.0
        } else {
            let centers: Vec<f32> = skill
                .children
                .iter()
                .map(|child| self.place(child, depth + 1, next_slot))
                .collect();
            let first = centers.first().copied().unwrap_or_default();
            let last = centers.last().copied().unwrap_or_default();
            (first + last) / 2.0
        };

        let top = s.margin_top + depth as f32 * (s.node_height + s.vertical_gap);
        self.boxes.insert(
            skill.id.clone(),
            ClientRect::new(center - s.node_width / 2.0, top, s.node_width, s.node_height),
        );
        center
    }
}

impl LayoutHost for TieredLayout {
    fn bounding_client_rect(&self, id: &SkillId) -> Option<ClientRect> {
        self.page_rect(id).map(|r| r.to_client(self.viewport.scroll))
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> LayoutSettings {
        LayoutSettings {
            node_width: 10.0,
            node_height: 10.0,
            horizontal_gap: 10.0,
            vertical_gap: 20.0,
            margin_top: 5.0,
        }
    }

    fn forest() -> Vec<Skill> {
        vec![Skill::new("root", "Root").with_children(vec![
            Skill::new("a", "A"),
            Skill::new("b", "B"),
            Skill::new("c", "C"),
        ])]
    }

    fn id(s: &str) -> SkillId {
        SkillId::from(s)
    }

    #[test]
    fn leaves_take_consecutive_slots_and_parent_centres_over_them() {
        let layout = TieredLayout::new(&forest(), settings(), Viewport::new(50.0, 100.0));
        assert_eq!(layout.content_width(), 50.0);

        assert_eq!(layout.page_rect(&id("a")), Some(ClientRect::new(0.0, 35.0, 10.0, 10.0)));
        assert_eq!(layout.page_rect(&id("c")), Some(ClientRect::new(40.0, 35.0, 10.0, 10.0)));
        assert_eq!(layout.page_rect(&id("root")), Some(ClientRect::new(20.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn wider_viewport_centres_content() {
        let mut layout = TieredLayout::new(&forest(), settings(), Viewport::new(50.0, 100.0));
        layout.resize(150.0, 100.0);
        let root = layout.page_rect(&id("root")).expect("root is placed");
        assert_eq!(root.left, 70.0);
    }

    #[test]
    fn client_rect_subtracts_scroll() {
        let mut layout = TieredLayout::new(&forest(), settings(), Viewport::new(50.0, 100.0));
        layout.scroll_to(ScrollOffset::new(5.0, 30.0));
        let rect = layout.bounding_client_rect(&id("a")).expect("a is placed");
        assert_eq!(rect, ClientRect::new(-5.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn detached_nodes_have_no_geometry() {
        let mut layout = TieredLayout::new(&forest(), settings(), Viewport::new(50.0, 100.0));
        assert!(layout.detach(&id("b")));
        assert!(!layout.detach(&id("b")));
        assert_eq!(layout.bounding_client_rect(&id("b")), None);
    }
}
