//! The whole rendered forest: one root segment per top-level skill.

use std::time::Instant;

use engine::raster::{Canvas, Palette, draw_view_tree};
use engine::resize::ResizeListeners;
use engine::throttle::Throttle;
use engine::view_tree::{ViewTree, hit_test};

use crate::error::{Result, SkillTreeError};
use crate::layout::LayoutHost;
use crate::segment::{ChildPosition, SkillAction, SkillTreeSegment};
use crate::selection::toggle_selection;
use crate::settings::TreeSettings;
use crate::skill::{Skill, SkillId};
use crate::state::SkillStore;

#[derive(Debug, Clone)]
pub struct SkillTree {
    roots: Vec<SkillTreeSegment>,
    throttle: Throttle,
    edge_thickness: u32,
}

impl SkillTree {
    pub fn new(skills: &[Skill], settings: &TreeSettings) -> Self {
        Self {
            roots: skills.iter().map(SkillTreeSegment::new).collect(),
            throttle: settings.resize.to_throttle(),
            edge_thickness: settings.render.edge_thickness,
        }
    }

    pub fn roots(&self) -> &[SkillTreeSegment] {
        &self.roots
    }

    /// Pre-order list of every segment.
    pub fn segments(&self) -> Vec<&SkillTreeSegment> {
        fn visit<'a>(seg: &'a SkillTreeSegment, out: &mut Vec<&'a SkillTreeSegment>) {
            out.push(seg);
            for child in seg.children() {
                visit(child, out);
            }
        }
        let mut out = Vec::new();
        for root in &self.roots {
            visit(root, &mut out);
        }
        out
    }

    pub fn depth(&self) -> usize {
        fn depth_of(seg: &SkillTreeSegment) -> usize {
            1 + seg.children().iter().map(depth_of).max().unwrap_or(0)
        }
        self.roots.iter().map(depth_of).max().unwrap_or(0)
    }

    pub fn find(&self, id: &SkillId) -> Option<&SkillTreeSegment> {
        self.roots.iter().find_map(|r| r.find(id))
    }

    pub fn anchor(&self, id: &SkillId) -> Option<ChildPosition> {
        self.find(id).map(SkillTreeSegment::position)
    }

    pub fn mount<H: LayoutHost + ?Sized>(
        &mut self,
        listeners: &mut ResizeListeners<SkillId>,
        host: &H,
    ) -> Result<()> {
        for root in &mut self.roots {
            root.mount(listeners, host, &self.throttle)?;
        }
        tracing::debug!(listeners = listeners.len(), "skill tree mounted");
        Ok(())
    }

    pub fn unmount(&mut self, listeners: &mut ResizeListeners<SkillId>) -> usize {
        let released: usize = self
            .roots
            .iter_mut()
            .map(|root| root.unmount(listeners))
            .sum();
        tracing::debug!(released, "skill tree unmounted");
        released
    }

    /// One synchronization pass over the forest. Returns the number of nodes that changed.
    pub fn sync<S: SkillStore + ?Sized>(&self, store: &mut S) -> usize {
        self.roots.iter().map(|root| root.sync(store, None)).sum()
    }

    /// Runs synchronization passes until one makes no change.
    pub fn settle<S: SkillStore + ?Sized>(&self, store: &mut S) -> usize {
        let mut total = 0;
        for _ in 0..=self.depth() {
            let changed = self.sync(store);
            if changed == 0 {
                break;
            }
            total += changed;
        }
        total
    }

    /// Delivers a window resize at `now`; returns how many nodes were re-measured.
    pub fn handle_resize<H: LayoutHost + ?Sized>(
        &mut self,
        listeners: &mut ResizeListeners<SkillId>,
        host: &H,
        now: Instant,
    ) -> Result<usize> {
        let fired = listeners.dispatch(now);
        self.remeasure(&fired, host)
    }

    /// Delivers trailing resize calls whose throttle window has passed.
    pub fn flush_resize<H: LayoutHost + ?Sized>(
        &mut self,
        listeners: &mut ResizeListeners<SkillId>,
        host: &H,
        now: Instant,
    ) -> Result<usize> {
        let fired = listeners.poll(now);
        self.remeasure(&fired, host)
    }

    /// Measures every fired id even when one fails, then returns the first failure.
    fn remeasure<H: LayoutHost + ?Sized>(&mut self, ids: &[SkillId], host: &H) -> Result<usize> {
        let mut measured = 0;
        let mut first_err = None;
        for id in ids {
            // The registry may be shared with other trees.
            let Some(seg) = self.roots.iter_mut().find_map(|r| r.find_mut(id)) else {
                continue;
            };
            match seg.measure(host) {
                Ok(()) => measured += 1,
                Err(err) => {
                    tracing::warn!(%id, %err, "re-measure failed");
                    first_err.get_or_insert(err);
                }
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(measured),
        }
    }

    pub fn render<S: SkillStore + ?Sized>(&self, store: &S) -> ViewTree<SkillAction> {
        let mut out = ViewTree::new();
        for root in &self.roots {
            root.render(store, None, self.edge_thickness, &mut out);
        }
        out
    }

    /// Renders the tree and paints it onto a fresh `width` x `height` canvas.
    pub fn rasterize<S: SkillStore + ?Sized>(
        &self,
        store: &S,
        width: u32,
        height: u32,
        palette: &Palette,
    ) -> Canvas {
        let mut canvas = Canvas::new(width, height);
        draw_view_tree(&mut canvas, &self.render(store), palette);
        canvas
    }

    /// Toggles selection on `id` and propagates the result down the tree.
    pub fn toggle<S: SkillStore + ?Sized>(&self, store: &mut S, id: &SkillId) -> Result<bool> {
        if self.find(id).is_none() {
            return Err(SkillTreeError::UnknownSkill(id.clone()));
        }
        let changed = toggle_selection(store, id);
        if changed {
            self.settle(store);
        }
        Ok(changed)
    }

    /// Hit-tests `view` at a page-space pixel and toggles the node under it.
    pub fn click<S: SkillStore + ?Sized>(
        &self,
        store: &mut S,
        view: &ViewTree<SkillAction>,
        x: u32,
        y: u32,
    ) -> Result<Option<SkillId>> {
        let Some(SkillAction::Toggle(id)) = hit_test(view, x, y) else {
            return Ok(None);
        };
        self.toggle(store, &id)?;
        Ok(Some(id))
    }
}
