//! Page and client geometry.
//!
//! A [`ClientRect`] is what a layout host reports for an element: a box relative to the visible
//! viewport. Adding the viewport's [`ScrollOffset`] turns it into page coordinates, which stay
//! put while the user scrolls.

use serde::{Deserialize, Serialize};

use crate::ui::Rect;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollOffset {
    pub x: f32,
    pub y: f32,
}

impl ScrollOffset {
    pub const ZERO: ScrollOffset = ScrollOffset { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scroll: ScrollOffset,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll: ScrollOffset::ZERO,
        }
    }

    pub fn with_scroll(mut self, scroll: ScrollOffset) -> Self {
        self.scroll = scroll;
        self
    }
}

/// An element's bounding box.
///
/// Whether the box is client- or page-relative depends on where it came from; use
/// [`ClientRect::to_page`] / [`ClientRect::to_client`] to move between the two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ClientRect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.left + self.width / 2.0
    }

    pub fn to_page(&self, scroll: ScrollOffset) -> Self {
        Self {
            left: self.left + scroll.x,
            top: self.top + scroll.y,
            ..*self
        }
    }

    pub fn to_client(&self, scroll: ScrollOffset) -> Self {
        Self {
            left: self.left - scroll.x,
            top: self.top - scroll.y,
            ..*self
        }
    }

    /// Snaps the box onto the pixel grid. Anything left of / above the origin is cut off.
    pub fn to_pixel_rect(&self) -> Rect {
        let x0 = self.left.round().max(0.0);
        let y0 = self.top.round().max(0.0);
        let x1 = self.right().round().max(x0);
        let y1 = self.bottom().round().max(y0);
        Rect::new(x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32)
    }
}

/// Snaps a page-space point to the signed pixel grid used by line primitives.
pub fn to_pixel_point(x: f32, y: f32) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}
