//! CPU rasteriser for [`ViewTree`]s.
//!
//! Draws into a plain RGBA buffer so renders can be hashed, written to disk or compared in
//! tests without a window.

use sha2::{Digest, Sha256};

use crate::ui::Rect;
use crate::view_tree::{EdgeNode, GlyphNode, Tone, ViewNode, ViewTree};

pub type Color = [u8; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub muted: Color,
    pub available: Color,
    pub active: Color,
    pub glyph_fill: Color,
}

impl Palette {
    pub fn tone(&self, tone: Tone) -> Color {
        match tone {
            Tone::Muted => self.muted,
            Tone::Available => self.available,
            Tone::Active => self.active,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: [10, 10, 14, 255],
            muted: [70, 70, 84, 255],
            available: [0, 229, 255, 255],
            active: [255, 215, 0, 255],
            glyph_fill: [28, 28, 38, 255],
        }
    }
}

/// In-memory RGBA surface.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    buf: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        Self {
            width,
            height,
            buf: vec![0u8; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn frame(&self) -> &[u8] {
        &self.buf
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let idx = self.index(x, y)?;
        let px = &self.buf[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if let Some(idx) = self.index(x, y) {
            self.buf[idx..idx + 4].copy_from_slice(&color);
        }
    }

    pub fn clear(&mut self, color: Color) {
        for px in self.buf.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let clipped = rect.clip_to(self.width, self.height);
        if clipped.is_empty() {
            return;
        }
        let stride = self.width as usize * 4;
        let row_bytes = clipped.w as usize * 4;
        for y in clipped.y..clipped.bottom() {
            let start = y as usize * stride + clipped.x as usize * 4;
            for px in self.buf[start..start + row_bytes].chunks_exact_mut(4) {
                px.copy_from_slice(&color);
            }
        }
    }

    pub fn rect_outline(&mut self, rect: Rect, thickness: u32, color: Color) {
        if rect.is_empty() || thickness == 0 {
            return;
        }
        let t = thickness.min(rect.w).min(rect.h);
        self.fill_rect(Rect::new(rect.x, rect.y, rect.w, t), color);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - t, rect.w, t), color);
        self.fill_rect(Rect::new(rect.x, rect.y, t, rect.h), color);
        self.fill_rect(Rect::new(rect.right() - t, rect.y, t, rect.h), color);
    }

    /// Bresenham line; each step stamps a `thickness`-sized square centred on the point.
    pub fn draw_line(&mut self, start: (i32, i32), end: (i32, i32), thickness: u32, color: Color) {
        let (mut x, mut y) = start;
        let dx = (end.0 - x).abs();
        let dy = -(end.1 - y).abs();
        let sx = if x < end.0 { 1 } else { -1 };
        let sy = if y < end.1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.stamp(x, y, thickness, color);
            if (x, y) == end {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn stamp(&mut self, cx: i32, cy: i32, thickness: u32, color: Color) {
        let t = thickness.max(1) as i32;
        let half = t / 2;
        for y in (cy - half)..(cy - half + t) {
            for x in (cx - half)..(cx - half + t) {
                if x >= 0 && y >= 0 {
                    self.set_pixel(x as u32, y as u32, color);
                }
            }
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }
}

/// Paints `view` in draw order onto a cleared canvas.
pub fn draw_view_tree<A>(canvas: &mut Canvas, view: &ViewTree<A>, palette: &Palette) {
    canvas.clear(palette.background);
    for node in &view.nodes {
        match node {
            ViewNode::Edge(edge) => draw_edge(canvas, edge, palette),
            ViewNode::Glyph(glyph) => draw_glyph(canvas, glyph, palette),
        }
    }
}

fn draw_edge(canvas: &mut Canvas, edge: &EdgeNode, palette: &Palette) {
    canvas.draw_line(edge.start, edge.end, edge.thickness, palette.tone(edge.tone));
}

fn draw_glyph<A>(canvas: &mut Canvas, glyph: &GlyphNode<A>, palette: &Palette) {
    let color = palette.tone(glyph.tone);
    canvas.fill_rect(glyph.rect, palette.glyph_fill);
    canvas.rect_outline(glyph.rect, 2, color);
    if glyph.tone == Tone::Active {
        canvas.fill_rect(glyph.rect.inset(glyph.rect.w.min(glyph.rect.h) / 3), color);
    }
}

/// SHA-256 of a frame, hex encoded.
pub fn frame_hash(frame: &[u8]) -> String {
    hex::encode(Sha256::digest(frame))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = [255, 0, 0, 255];

    #[test]
    fn fill_rect_clips_to_canvas() {
        let mut c = Canvas::new(10, 10);
        c.fill_rect(Rect::new(8, 8, 5, 5), RED);
        assert_eq!(c.pixel(9, 9), Some(RED));
        assert_eq!(c.pixel(7, 7), Some([0, 0, 0, 0]));
        assert_eq!(c.pixel(10, 10), None);
    }

    #[test]
    fn draw_line_hits_both_endpoints() {
        let mut c = Canvas::new(20, 20);
        c.draw_line((2, 3), (15, 17), 1, RED);
        assert_eq!(c.pixel(2, 3), Some(RED));
        assert_eq!(c.pixel(15, 17), Some(RED));
    }

    #[test]
    fn draw_line_ignores_offscreen_points() {
        let mut c = Canvas::new(5, 5);
        c.draw_line((-10, 2), (2, 2), 3, RED);
        assert_eq!(c.pixel(0, 2), Some(RED));
        assert_eq!(c.pixel(2, 2), Some(RED));
    }

    #[test]
    fn frame_hash_changes_with_content() {
        let mut c = Canvas::new(4, 4);
        let empty = frame_hash(c.frame());
        assert_eq!(empty.len(), 64);
        c.set_pixel(1, 1, RED);
        assert_ne!(frame_hash(c.frame()), empty);
    }

    #[test]
    fn active_glyph_gets_filled_center() {
        let mut view = ViewTree::new();
        view.push(ViewNode::Glyph(GlyphNode {
            rect: Rect::new(0, 0, 30, 30),
            label: "x".to_string(),
            tone: Tone::Active,
            action: (),
        }));
        let palette = Palette::default();
        let mut c = Canvas::new(40, 40);
        draw_view_tree(&mut c, &view, &palette);
        assert_eq!(c.pixel(15, 15), Some(palette.active));
        assert_eq!(c.pixel(35, 35), Some(palette.background));
    }
}
