//! One node of the rendered skill tree.
//!
//! A segment mirrors one [`Skill`]: it owns the node's measured anchor and its resize listener,
//! keeps the node's state in step with its parent, and draws the edge up to its parent followed
//! by its own glyph before handing its anchor, id and state to its children.

use engine::geometry::{ClientRect, to_pixel_point};
use engine::resize::{ListenerId, ResizeListeners};
use engine::throttle::Throttle;
use engine::view_tree::{EdgeNode, GlyphNode, Tone, ViewNode, ViewTree};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SkillTreeError};
use crate::layout::LayoutHost;
use crate::skill::{Skill, SkillId};
use crate::state::{NodeState, SkillStore};
use crate::sync::sync_node;

/// Where an incoming edge ends: the node's top centre, in page coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChildPosition {
    pub top: f32,
    pub center: f32,
}

/// Where outgoing edges start: the parent's bottom centre, in page coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ParentPosition {
    pub center: f32,
    pub bottom: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillAction {
    Toggle(SkillId),
}

pub fn tone_for(state: NodeState) -> Tone {
    match state {
        NodeState::Locked => Tone::Muted,
        NodeState::Unlocked => Tone::Available,
        NodeState::Selected => Tone::Active,
    }
}

#[derive(Debug, Clone)]
pub struct SkillTreeSegment {
    id: SkillId,
    title: String,
    position: ChildPosition,
    bottom: f32,
    page_box: Option<ClientRect>,
    listener: Option<ListenerId>,
    children: Vec<SkillTreeSegment>,
}

impl SkillTreeSegment {
    pub fn new(skill: &Skill) -> Self {
        Self {
            id: skill.id.clone(),
            title: skill.title.clone(),
            position: ChildPosition::default(),
            bottom: 0.0,
            page_box: None,
            listener: None,
            children: skill.children.iter().map(Self::new).collect(),
        }
    }

    pub fn id(&self) -> &SkillId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn children(&self) -> &[SkillTreeSegment] {
        &self.children
    }

    /// Anchor incoming edges end at. `{0, 0}` until the first measurement.
    pub fn position(&self) -> ChildPosition {
        self.position
    }

    /// Anchor this node's children draw their edges from.
    pub fn parent_anchor(&self) -> ParentPosition {
        ParentPosition {
            center: self.position.center,
            bottom: self.bottom,
        }
    }

    pub fn page_box(&self) -> Option<ClientRect> {
        self.page_box
    }

    pub fn listener(&self) -> Option<ListenerId> {
        self.listener
    }

    pub fn is_mounted(&self) -> bool {
        self.listener.is_some()
    }

    pub fn find(&self, id: &SkillId) -> Option<&SkillTreeSegment> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: &SkillId) -> Option<&mut SkillTreeSegment> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Reads the node's box from `host` and publishes its anchors in page coordinates.
    pub fn measure<H: LayoutHost + ?Sized>(&mut self, host: &H) -> Result<()> {
        let rect = host
            .bounding_client_rect(&self.id)
            .ok_or_else(|| SkillTreeError::NotMounted(self.id.clone()))?;
        let page = rect.to_page(host.viewport().scroll);

        self.position = ChildPosition {
            top: page.top,
            center: page.center_x(),
        };
        self.bottom = page.bottom();
        self.page_box = Some(page);
        tracing::debug!(
            skill = %self.id,
            top = self.position.top,
            center = self.position.center,
            "skill node measured"
        );
        Ok(())
    }

    /// Subscribes this subtree to resize events and takes the first measurement.
    pub fn mount<H: LayoutHost + ?Sized>(
        &mut self,
        listeners: &mut ResizeListeners<SkillId>,
        host: &H,
        throttle: &Throttle,
    ) -> Result<()> {
        if self.listener.is_none() {
            self.listener = Some(listeners.subscribe_with(self.id.clone(), throttle.clone()));
        }
        self.measure(host)?;
        for child in &mut self.children {
            child.mount(listeners, host, throttle)?;
        }
        Ok(())
    }

    /// Releases every listener in this subtree; returns how many were released.
    pub fn unmount(&mut self, listeners: &mut ResizeListeners<SkillId>) -> usize {
        let mut released = 0;
        if let Some(id) = self.listener.take() {
            if listeners.unsubscribe(id) {
                released += 1;
            }
        }
        for child in &mut self.children {
            released += child.unmount(listeners);
        }
        released
    }

    /// One synchronization pass over this subtree. `parent` is `None` for a root.
    ///
    /// Children see this node's state as it is after its own step, so a single pass
    /// propagates a change all the way down. Returns the number of nodes that changed.
    pub fn sync<S: SkillStore + ?Sized>(&self, store: &mut S, parent: Option<NodeState>) -> usize {
        let mut changed = usize::from(sync_node(store, &self.id, parent));
        let own = store.get(&self.id);
        for child in &self.children {
            changed += child.sync(store, Some(own));
        }
        changed
    }

    /// Emits the edge to `parent` (if any), this node's glyph, then the children.
    pub fn render<S: SkillStore + ?Sized>(
        &self,
        store: &S,
        parent: Option<ParentPosition>,
        edge_thickness: u32,
        out: &mut ViewTree<SkillAction>,
    ) {
        let state = store.get(&self.id);
        let tone = tone_for(state);

        if let Some(from) = parent {
            out.push(ViewNode::Edge(EdgeNode {
                start: to_pixel_point(from.center, from.bottom),
                end: to_pixel_point(self.position.center, self.position.top),
                thickness: edge_thickness,
                tone,
            }));
        }

        out.push(ViewNode::Glyph(GlyphNode {
            rect: self.page_box.map(|b| b.to_pixel_rect()).unwrap_or_default(),
            label: self.title.clone(),
            tone,
            action: SkillAction::Toggle(self.id.clone()),
        }));

        let anchor = self.parent_anchor();
        for child in &self.children {
            child.render(store, Some(anchor), edge_thickness, out);
        }
    }
}
