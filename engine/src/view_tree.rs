use serde::{Deserialize, Serialize};

use crate::ui::Rect;

/// Flat, draw-ordered list of render primitives. Later nodes paint over earlier ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewTree<A> {
    pub nodes: Vec<ViewNode<A>>,
}

impl<A> ViewTree<A> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn push(&mut self, node: ViewNode<A>) {
        self.nodes.push(node);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn glyphs(&self) -> impl Iterator<Item = &GlyphNode<A>> {
        self.nodes.iter().filter_map(|n| match n {
            ViewNode::Glyph(g) => Some(g),
            ViewNode::Edge(_) => None,
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeNode> {
        self.nodes.iter().filter_map(|n| match n {
            ViewNode::Edge(e) => Some(e),
            ViewNode::Glyph(_) => None,
        })
    }
}

impl<A> Default for ViewTree<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ViewNode<A> {
    Glyph(GlyphNode<A>),
    Edge(EdgeNode),
}

/// Visual emphasis of a primitive; the rasteriser maps it onto a palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    Muted,
    Available,
    Active,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlyphNode<A> {
    pub rect: Rect,
    pub label: String,
    pub tone: Tone,
    pub action: A,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeNode {
    pub start: (i32, i32),
    pub end: (i32, i32),
    pub thickness: u32,
    pub tone: Tone,
}

/// Returns the action of the topmost glyph under `(x, y)`.
pub fn hit_test<A: Clone>(view: &ViewTree<A>, x: u32, y: u32) -> Option<A> {
    view.nodes.iter().rev().find_map(|node| match node {
        ViewNode::Glyph(glyph) if glyph.rect.contains(x, y) => Some(glyph.action.clone()),
        _ => None,
    })
}
