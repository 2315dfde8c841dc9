//! Pixel-space rectangles.
//!
//! Rendering works in whole pixels on an unsigned grid; page geometry (which can be fractional
//! and scrolled) lives in [`crate::geometry`] and is snapped into a [`Rect`] right before drawing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Returns the rectangle shrunk by `inset` pixels on every side.
    ///
    /// If the inset exceeds the rect size, the resulting width/height saturate to 0.
    pub fn inset(&self, inset: u32) -> Self {
        let twice = inset.saturating_mul(2);
        Self {
            x: self.x.saturating_add(inset),
            y: self.y.saturating_add(inset),
            w: self.w.saturating_sub(twice),
            h: self.h.saturating_sub(twice),
        }
    }

    /// Clips this rect to a `width` x `height` surface.
    pub fn clip_to(&self, width: u32, height: u32) -> Self {
        let x1 = self.right().min(width);
        let y1 = self.bottom().min(height);
        let x = self.x.min(x1);
        let y = self.y.min(y1);
        Self {
            x,
            y,
            w: x1 - x,
            h: y1 - y,
        }
    }
}
